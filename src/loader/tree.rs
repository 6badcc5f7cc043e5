//! Owned element tree built from a Doxygen XML document.
//!
//! Compound documents are cached and handed out to several consumers, so the
//! tree owns its strings instead of borrowing from the source text.

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

/// Node of an element's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	/// Nested element.
	Element(Element),
	/// Character data, entities already unescaped.
	Text(String),
}

/// An XML element with its attributes and mixed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
	name: String,
	attributes: Vec<(String, String)>,
	children: Vec<Node>,
}

impl Element {
	/// Tag name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Value of attribute `key`.
	pub fn attr(&self, key: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Direct child elements.
	pub fn elements(&self) -> impl Iterator<Item = &Element> {
		self.children.iter().filter_map(|node| match node {
			Node::Element(el) => Some(el),
			Node::Text(_) => None,
		})
	}

	/// First direct child element named `name`.
	pub fn child(&self, name: &str) -> Option<&Element> {
		self.elements().find(|el| el.name == name)
	}

	/// Text of the first direct child named `name`, trimmed.
	pub fn child_text(&self, name: &str) -> Option<String> {
		self.child(name).map(|el| el.text().trim().to_string())
	}

	/// Concatenated text of this element and all descendants.
	pub fn text(&self) -> String {
		let mut out = String::new();
		self.collect_text(&mut out);
		out
	}

	fn collect_text(&self, out: &mut String) {
		for node in &self.children {
			match node {
				Node::Text(text) => out.push_str(text),
				Node::Element(el) => el.collect_text(out),
			}
		}
	}

	/// Pre-order traversal of this element and every descendant element.
	pub fn descendants(&self) -> Descendants<'_> {
		Descendants { stack: vec![self] }
	}

	/// First descendant (or self) with tag `tag` and attribute `id == id`.
	pub fn find_by_id(&self, tag: &str, id: &str) -> Option<&Element> {
		self.descendants()
			.find(|el| el.name == tag && el.attr("id") == Some(id))
	}

	/// Render as indented XML. Whitespace-only text is dropped so the output
	/// can be re-indented.
	pub fn to_pretty_xml(&self) -> String {
		let mut out = String::new();
		self.write_pretty(0, &mut out);
		out
	}

	fn write_pretty(&self, depth: usize, out: &mut String) {
		let indent = "  ".repeat(depth);
		out.push_str(&indent);
		out.push('<');
		out.push_str(&self.name);
		for (key, value) in &self.attributes {
			out.push_str(&format!(" {key}=\"{}\"", escape(value.as_str())));
		}

		let content: Vec<&Node> = self
			.children
			.iter()
			.filter(|node| !matches!(node, Node::Text(text) if text.trim().is_empty()))
			.collect();

		match content.as_slice() {
			[] => out.push_str("/>\n"),
			[Node::Text(text)] => {
				out.push_str(&format!(">{}</{}>\n", escape(text.trim()), self.name));
			}
			nodes => {
				out.push_str(">\n");
				for node in nodes {
					match node {
						Node::Element(el) => el.write_pretty(depth + 1, out),
						Node::Text(text) => {
							out.push_str(&indent);
							out.push_str("  ");
							out.push_str(&escape(text.trim()));
							out.push('\n');
						}
					}
				}
				out.push_str(&format!("{indent}</{}>\n", self.name));
			}
		}
	}
}

/// Iterator returned by [`Element::descendants`].
pub struct Descendants<'a> {
	stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
	type Item = &'a Element;

	fn next(&mut self) -> Option<Self::Item> {
		let current = self.stack.pop()?;
		let children: Vec<&Element> = current.elements().collect();
		self.stack.extend(children.into_iter().rev());
		Some(current)
	}
}

fn start_element(start: &BytesStart<'_>) -> Result<Element, String> {
	let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
	let mut attributes = Vec::new();
	for attr in start.attributes() {
		let attr = attr.map_err(|err| format!("bad attribute in <{name}>: {err}"))?;
		let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
		let value = attr
			.unescape_value()
			.map_err(|err| format!("bad attribute value in <{name}>: {err}"))?
			.into_owned();
		attributes.push((key, value));
	}
	Ok(Element {
		name,
		attributes,
		children: Vec::new(),
	})
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), String> {
	match stack.last_mut() {
		Some(parent) => {
			parent.children.push(Node::Element(element));
			Ok(())
		}
		None if root.is_none() => {
			*root = Some(element);
			Ok(())
		}
		None => Err(format!("second root element <{}>", element.name)),
	}
}

/// Parse a complete XML document and return its root element.
pub fn parse_document(text: &str) -> Result<Element, String> {
	let mut reader = Reader::from_str(text);
	reader.config_mut().trim_text(false);

	let mut stack: Vec<Element> = Vec::new();
	let mut root: Option<Element> = None;

	loop {
		let event = reader
			.read_event()
			.map_err(|err| format!("{err} (at byte {})", reader.buffer_position()))?;
		match event {
			Event::Start(start) => stack.push(start_element(&start)?),
			Event::Empty(start) => {
				let element = start_element(&start)?;
				attach(&mut stack, &mut root, element)?;
			}
			Event::End(_) => {
				let element = stack
					.pop()
					.ok_or_else(|| "closing tag without an open element".to_string())?;
				attach(&mut stack, &mut root, element)?;
			}
			Event::Text(text) => {
				if let Some(parent) = stack.last_mut() {
					let text = text.unescape().map_err(|err| err.to_string())?;
					parent.children.push(Node::Text(text.into_owned()));
				}
			}
			Event::CData(data) => {
				if let Some(parent) = stack.last_mut() {
					let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
					parent.children.push(Node::Text(text));
				}
			}
			Event::Eof => break,
			_ => {}
		}
	}

	if let Some(open) = stack.last() {
		return Err(format!("unexpected end of document inside <{}>", open.name));
	}
	root.ok_or_else(|| "document has no root element".to_string())
}
