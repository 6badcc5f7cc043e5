//! CLI entrypoint.

use std::error::Error;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use doxref::core_api::{DEFAULT_TREE_DEPTH, XML_DIR_ENV, name_matcher};
use doxref::{ChildSelection, DoxyIndex, Entity, IndexBuilder, Kind, RefId, RelationSet, RenderFlags};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
/// Containment relations accepted by `--relation`.
enum RelationArg {
	/// File declares member.
	File,
	/// Group documents member.
	Group,
	/// Struct field or enum value.
	Field,
	/// Directory or page nesting.
	Nested,
}

impl From<RelationArg> for RelationSet {
	fn from(arg: RelationArg) -> Self {
		match arg {
			RelationArg::File => Self::FILE,
			RelationArg::Group => Self::GROUP,
			RelationArg::Field => Self::FIELD,
			RelationArg::Nested => Self::NESTED,
		}
	}
}

/// Fold the selected relations, defaulting to all of them.
fn relation_set(args: &[RelationArg]) -> RelationSet {
	if args.is_empty() {
		RelationSet::all()
	} else {
		args.iter()
			.fold(RelationSet::empty(), |acc, arg| acc | RelationSet::from(*arg))
	}
}

#[derive(Args, Clone)]
struct ChildrenArgs {
	/// Entity reference (target string, `!refid` or `r:refid`)
	reference: String,

	/// Relations to traverse (file, group, field, nested). Defaults to all.
	#[arg(short = 'r', long, value_delimiter = ',')]
	relation: Vec<RelationArg>,

	/// Only list these children, in this order
	#[arg(long, value_delimiter = ',', conflicts_with_all = ["exclude", "all"])]
	include: Vec<String>,

	/// List every child except these
	#[arg(long, value_delimiter = ',', conflicts_with = "all")]
	exclude: Vec<String>,

	/// List children of the parent's own kind too
	#[arg(short = 'a', long, default_value_t = false)]
	all: bool,

	/// Options handed down to every child (noindex, hideloc, hidedef, hidedoc)
	#[arg(short = 'o', long, value_delimiter = ',')]
	options: Vec<String>,

	/// Maximum number of children to list
	#[arg(short = 'l', long)]
	limit: Option<usize>,
}

#[derive(Subcommand, Clone)]
enum Command {
	/// Summarize the index.
	Info,
	/// Resolve a target string to a refid.
	Resolve {
		/// Target string (`path::name`, `[name]`, `kind[name]`, `!refid`)
		target: String,
		/// Prefer candidates directly contained in this entity
		#[arg(short = 's', long)]
		scope: Option<String>,
	},
	/// Print the canonical target string of an entity.
	Target {
		/// Entity reference
		reference: String,
	},
	/// Resolve by kind and name.
	Name {
		/// `[KIND] NAME`
		#[arg(num_args = 1..=2, required = true)]
		words: Vec<String>,
		/// Prefer candidates directly contained in this entity
		#[arg(short = 's', long)]
		scope: Option<String>,
	},
	/// Show one entity.
	Get {
		/// Entity reference
		reference: String,
	},
	/// List entities by kind.
	Find {
		/// Only entities without a containing compound
		#[arg(long, default_value_t = false)]
		no_parent: bool,
		/// Name filter (`*` and `?` wildcards, `|` alternatives)
		#[arg(short = 'n', long)]
		name: Option<String>,
		/// Match the name filter case sensitively
		#[arg(short = 'c', long, default_value_t = false)]
		case_sensitive: bool,
		/// Kinds to list; all but enum values when omitted
		kinds: Vec<String>,
	},
	/// List the compounds containing an entity.
	Parents {
		/// Entity reference
		reference: String,
	},
	/// List the children of an entity.
	Children(ChildrenArgs),
	/// Print the rendering role of an entity.
	Role {
		/// Entity reference
		reference: String,
	},
	/// Print the XML definition of an entity.
	Show {
		/// Entity reference
		reference: String,
	},
	/// Print the containment tree below an entity.
	Tree {
		/// Entity reference
		reference: String,
		/// Maximum depth
		#[arg(short = 'd', long, default_value_t = DEFAULT_TREE_DEPTH)]
		depth: usize,
		/// Relations to traverse. Defaults to all.
		#[arg(short = 'r', long, value_delimiter = ',')]
		relation: Vec<RelationArg>,
	},
	/// Read commands from stdin, one per line.
	Shell,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Parsed command-line options for the doxref CLI.
struct Cli {
	/// Doxygen XML output directory (defaults to $DOXREF_XML_DIR)
	#[arg(short = 'x', long, global = true)]
	xml_dir: Option<PathBuf>,

	/// Fail when any compound document cannot be read
	#[arg(long, default_value_t = false, global = true)]
	strict: bool,

	/// Log debug output to stderr
	#[arg(short = 'v', long, default_value_t = false, global = true)]
	verbose: bool,

	/// Disable ANSI colors in CLI output
	#[arg(long, default_value_t = false, global = true)]
	no_color: bool,

	/// Print JSON instead of text
	#[arg(long, default_value_t = false, global = true)]
	json: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
/// One line of shell input.
struct ShellLine {
	#[command(subcommand)]
	command: Command,
}

/// How results are printed.
#[derive(Debug, Clone, Copy)]
struct Output {
	color: bool,
	json: bool,
}

fn should_color_output(cli: &Cli) -> bool {
	if cli.no_color || cli.json {
		return false;
	}
	if std::env::var_os("NO_COLOR").is_some() {
		return false;
	}
	if std::env::var("TERM").ok().as_deref() == Some("dumb") {
		return false;
	}
	std::io::stdout().is_terminal()
}

fn init_logging(verbose: bool) {
	let default = if verbose { "doxref=debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.with_target(false)
		.try_init();
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	if let Err(e) = run(cli) {
		eprintln!("{e}");
		process::exit(1);
	}
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
	let builder = cli
		.xml_dir
		.clone()
		.map(IndexBuilder::new)
		.or_else(IndexBuilder::from_env)
		.ok_or_else(|| format!("no XML directory given; pass --xml-dir or set {XML_DIR_ENV}"))?;
	let index = builder.with_strict(cli.strict).build()?;

	let out = Output {
		color: should_color_output(&cli),
		json: cli.json,
	};

	match cli.command {
		Command::Shell => run_shell(&index, out),
		command => execute(&index, out, command),
	}
}

/// Interactive loop. Errors are reported and the loop continues.
fn run_shell(index: &DoxyIndex, out: Output) -> Result<(), Box<dyn Error>> {
	let stdin = io::stdin();
	let interactive = stdin.is_terminal();
	let mut stdout = io::stdout();
	loop {
		if interactive {
			write!(stdout, "doxref> ")?;
			stdout.flush()?;
		}
		let mut line = String::new();
		if stdin.lock().read_line(&mut line)? == 0 {
			break;
		}
		let words: Vec<&str> = line.split_whitespace().collect();
		match words.as_slice() {
			[] => continue,
			["quit" | "exit"] => break,
			_ => {}
		}
		let command = match ShellLine::try_parse_from(words.iter().copied()) {
			Ok(parsed) => parsed.command,
			Err(err) => {
				eprintln!("{err}");
				continue;
			}
		};
		if matches!(command, Command::Shell) {
			eprintln!("already in a shell");
			continue;
		}
		if let Err(err) = execute(index, out, command) {
			eprintln!("{err}");
		}
	}
	Ok(())
}

/// Turn a CLI entity reference into a refid. `r:` prefixes a raw refid.
fn lookup(index: &DoxyIndex, reference: &str) -> doxref::Result<RefId> {
	match reference.trim().strip_prefix("r:") {
		Some(raw) => index.resolve(&format!("!{raw}")),
		None => index.resolve(reference),
	}
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

fn format_entity(entity: &Entity, qualified: &str, out: Output) -> String {
	let location = entity
		.location
		.as_ref()
		.map(|loc| loc.to_compact_string())
		.unwrap_or_default();
	let line = if out.color {
		format!(
			"{}  {}  {}  {}",
			entity.refid.cyan(),
			entity.kind.dimmed(),
			qualified.bold(),
			location.dimmed()
		)
	} else {
		format!("{}  {}  {}  {}", entity.refid, entity.kind, qualified, location)
	};
	line.trim_end().to_string()
}

fn print_entities(index: &DoxyIndex, entities: &[&Entity], out: Output) -> Result<(), Box<dyn Error>> {
	if out.json {
		return print_json(entities);
	}
	if entities.is_empty() {
		println!("No entities found.");
	}
	for entity in entities {
		let qualified = index.index().qualified_name(&entity.refid).unwrap_or(&entity.name);
		println!("{}", format_entity(entity, qualified, out));
	}
	Ok(())
}

fn print_refid(refid: &RefId, out: Output) -> Result<(), Box<dyn Error>> {
	if out.json {
		return print_json(refid);
	}
	println!("{refid}");
	Ok(())
}

fn execute(index: &DoxyIndex, out: Output, command: Command) -> Result<(), Box<dyn Error>> {
	match command {
		Command::Info => {
			let stats = index.stats();
			if out.json {
				return print_json(&stats);
			}
			println!("xml dir:   {}", index.loader().xml_dir().display());
			println!("documents: {}", stats.documents);
			println!("entities:  {}", stats.entities);
			println!("edges:     {}", stats.edges);
			println!("parents:   {}", stats.parents);
			println!("warnings:  {}", stats.warnings);
			for (kind, count) in &stats.kinds {
				println!("  {:<10} {count}", kind.as_str());
			}
			Ok(())
		}
		Command::Resolve { target, scope } => {
			let refid = match scope {
				Some(scope) => index.resolve_in_scope(&target, &lookup(index, &scope)?)?,
				None => index.resolve(&target)?,
			};
			print_refid(&refid, out)
		}
		Command::Target { reference } => {
			let target = index.target_of(&lookup(index, &reference)?)?;
			if out.json {
				return print_json(&target);
			}
			println!("{target}");
			Ok(())
		}
		Command::Name { words, scope } => {
			let (kind, name) = match words.as_slice() {
				[name] => (None, name.as_str()),
				[kind, name] => (
					Some(Kind::from_user(kind).ok_or_else(|| format!("unknown kind `{kind}`"))?),
					name.as_str(),
				),
				_ => return Err("expected `[KIND] NAME`".into()),
			};
			let scope = scope.map(|s| lookup(index, &s)).transpose()?;
			print_refid(&index.resolve_name(kind, name, scope.as_ref())?, out)
		}
		Command::Get { reference } => {
			let entity = index.get(&lookup(index, &reference)?)?;
			print_entities(index, &[entity], out)
		}
		Command::Find {
			no_parent,
			name,
			case_sensitive,
			kinds,
		} => {
			let kinds = kinds
				.iter()
				.map(|word| Kind::from_user(word).ok_or_else(|| format!("unknown kind `{word}`")))
				.collect::<Result<Vec<_>, _>>()?;
			let matcher = name
				.as_deref()
				.map(|pattern| name_matcher(pattern, case_sensitive))
				.transpose()?;
			let found: Vec<&Entity> = index
				.find(&kinds, no_parent)
				.into_iter()
				.filter(|entity| matcher.as_ref().is_none_or(|re| re.is_match(&entity.name)))
				.collect();
			print_entities(index, &found, out)
		}
		Command::Parents { reference } => {
			let parents = index.parents_of(&lookup(index, &reference)?)?;
			if out.json {
				return print_json(&parents);
			}
			for parent in parents {
				let relation = parent.relation.label();
				if out.color {
					println!("{}  {}  {}  {}", parent.refid.cyan(), parent.kind.dimmed(), parent.name.bold(), relation.dimmed());
				} else {
					println!("{}  {}  {}  {relation}", parent.refid, parent.kind, parent.name);
				}
			}
			Ok(())
		}
		Command::Children(args) => run_children(index, out, args),
		Command::Role { reference } => {
			let role = index.guess_kind(&lookup(index, &reference)?)?;
			if out.json {
				return print_json(&role);
			}
			println!("{role}");
			Ok(())
		}
		Command::Show { reference } => {
			let element = index.definition(&lookup(index, &reference)?)?;
			print!("{}", element.to_pretty_xml());
			Ok(())
		}
		Command::Tree {
			reference,
			depth,
			relation,
		} => {
			let tree = index.entity_tree(&lookup(index, &reference)?, relation_set(&relation), depth)?;
			if out.json {
				return print_json(&tree);
			}
			print_tree(&tree, 0, out);
			Ok(())
		}
		Command::Shell => Err("`shell` cannot be nested".into()),
	}
}

fn run_children(index: &DoxyIndex, out: Output, args: ChildrenArgs) -> Result<(), Box<dyn Error>> {
	let refid = lookup(index, &args.reference)?;
	let selection = if !args.include.is_empty() {
		ChildSelection::Include(args.include)
	} else if !args.exclude.is_empty() {
		ChildSelection::Exclude(args.exclude)
	} else if args.all {
		ChildSelection::All
	} else {
		ChildSelection::OtherKinds
	};
	let options = args
		.options
		.iter()
		.map(|word| RenderFlags::from_option(word).ok_or_else(|| format!("unknown option `{word}`")))
		.collect::<Result<Vec<_>, _>>()?
		.into_iter()
		.fold(RenderFlags::empty(), |acc, flag| acc | flag);

	let mut policy = index.child_policy();
	policy.relations = relation_set(&args.relation);
	policy.selection = selection;
	policy.options = options;
	if let Some(limit) = args.limit {
		policy.limit = limit;
	}

	let children = index.children_of(&refid, &policy)?;
	if out.json {
		return print_json(&children);
	}
	for child in children {
		let relation = child.relation.label();
		if out.color {
			println!("{}  {}  {}  {}", child.refid.cyan(), child.kind.dimmed(), child.name.bold(), relation.dimmed());
		} else {
			println!("{}  {}  {}  {relation}", child.refid, child.kind, child.name);
		}
	}
	Ok(())
}

fn print_tree(node: &doxref::EntityTreeNode, depth: usize, out: Output) {
	let indent = "  ".repeat(depth);
	let source = node.source.as_deref().unwrap_or_default();
	if out.color {
		println!("{indent}{} {} {}", node.kind.dimmed(), node.name.bold(), source.dimmed());
	} else {
		println!("{indent}{} {} {source}", node.kind, node.name);
	}
	for child in &node.children {
		print_tree(child, depth + 1, out);
	}
}
