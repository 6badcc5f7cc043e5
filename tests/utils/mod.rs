//! Shared fixtures: a small Doxygen XML output tree written to a temp dir.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

pub const INDEX: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<doxygenindex version="1.9.8">
  <compound refid="dir_a" kind="dir"><name>a</name></compound>
  <compound refid="dir_a_2sub" kind="dir"><name>a/sub</name></compound>
  <compound refid="a_2b_8h" kind="file"><name>b.h</name>
    <member refid="a_2b_8h_1af" kind="function"><name>f</name></member>
    <member refid="a_2b_8h_1ag" kind="function"><name>g</name></member>
  </compound>
  <compound refid="c_2b_8h" kind="file"><name>b.h</name>
    <member refid="c_2b_8h_1af" kind="function"><name>f</name></member>
  </compound>
  <compound refid="structWidgets" kind="struct"><name>Widgets</name></compound>
  <compound refid="group__widgets" kind="group"><name>Widgets</name></compound>
  <compound refid="missing_8h" kind="file"><name>missing.h</name></compound>
  <compound refid="broken_8h" kind="file"><name>broken.h</name></compound>
  <compound refid="conceptc" kind="concept"><name>c</name></compound>
</doxygenindex>
"#;

pub const DIR_A: &str = r#"<doxygen>
  <compounddef id="dir_a" kind="dir">
    <compoundname>a</compoundname>
    <innerdir refid="dir_a_2sub">a/sub</innerdir>
    <innerfile refid="a_2b_8h">b.h</innerfile>
    <location file="a/"/>
  </compounddef>
</doxygen>
"#;

pub const DIR_A_SUB: &str = r#"<doxygen>
  <compounddef id="dir_a_2sub" kind="dir">
    <compoundname>a/sub</compoundname>
    <location file="a/sub/"/>
  </compounddef>
</doxygen>
"#;

pub const FILE_A: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<doxygen version="1.9.8">
  <compounddef id="a_2b_8h" kind="file" language="C++">
    <compoundname>b.h</compoundname>
    <innerclass refid="structWidgets" prot="public">Widgets</innerclass>
    <sectiondef kind="define">
      <memberdef kind="define" id="a_2b_8h_1aMAX" prot="public" static="no">
        <name>MAX</name>
        <initializer>16</initializer>
        <briefdescription><para>Upper bound.</para></briefdescription>
        <location file="a/b.h" line="3" column="9" bodyfile="a/b.h" bodystart="3" bodyend="-1"/>
      </memberdef>
    </sectiondef>
    <sectiondef kind="enum">
      <memberdef kind="enum" id="a_2b_8h_1acolor" prot="public" static="no" strong="no">
        <type/>
        <name>color</name>
        <enumvalue id="a_2b_8h_1acolorRED" prot="public">
          <name>RED</name>
          <briefdescription/>
        </enumvalue>
        <enumvalue id="a_2b_8h_1acolorGREEN" prot="public">
          <name>GREEN</name>
        </enumvalue>
        <location file="a/b.h" line="10" column="1"/>
      </memberdef>
    </sectiondef>
    <sectiondef kind="typedef">
      <memberdef kind="typedef" id="a_2b_8h_1awidget__t" prot="public" static="no">
        <type>struct <ref refid="structWidgets" kindref="compound">Widgets</ref></type>
        <definition>typedef struct Widgets widget_t</definition>
        <name>widget_t</name>
        <location file="a/b.h" line="15" column="23"/>
      </memberdef>
    </sectiondef>
    <sectiondef kind="func">
      <memberdef kind="function" id="a_2b_8h_1af" prot="public" static="no">
        <type>int</type>
        <definition>int f</definition>
        <argsstring>(void)</argsstring>
        <name>f</name>
        <location file="a/b.h" line="20" column="5"/>
      </memberdef>
      <memberdef kind="function" id="a_2b_8h_1ag" prot="public" static="no">
        <type>void</type>
        <name>g</name>
        <param><type><ref refid="a_2b_8h_1awidget__t" kindref="member">widget_t</ref> *</type><declname>w</declname></param>
        <location file="a/b.h" line="22" column="6"/>
      </memberdef>
    </sectiondef>
    <sectiondef kind="var">
      <memberdef kind="variable" id="a_2b_8h_1acounter" prot="public" static="no" mutable="no">
        <type>int</type>
        <name>counter</name>
        <location file="a/b.h" line="25" column="12"/>
      </memberdef>
    </sectiondef>
    <briefdescription><para>Widget helpers.</para></briefdescription>
    <detaileddescription/>
    <programlisting><codeline lineno="1"><highlight class="normal">#define MAX 16</highlight></codeline></programlisting>
    <location file="a/b.h"/>
  </compounddef>
</doxygen>
"#;

pub const FILE_C: &str = r#"<doxygen>
  <compounddef id="c_2b_8h" kind="file">
    <compoundname>b.h</compoundname>
    <sectiondef kind="func">
      <memberdef kind="function" id="c_2b_8h_1af">
        <name>f</name>
        <location file="c/b.h" line="4"/>
      </memberdef>
    </sectiondef>
    <location file="c/b.h"/>
  </compounddef>
</doxygen>
"#;

pub const STRUCT_WIDGETS: &str = r#"<doxygen>
  <compounddef id="structWidgets" kind="struct" prot="public">
    <compoundname>Widgets</compoundname>
    <sectiondef kind="public-attrib">
      <memberdef kind="variable" id="structWidgets_1awidth" prot="public">
        <type>int</type>
        <name>width</name>
        <location file="a/b.h" line="6"/>
      </memberdef>
      <memberdef kind="variable" id="structWidgets_1aheight" prot="public">
        <type>int</type>
        <name>height</name>
        <location file="a/b.h" line="7"/>
      </memberdef>
    </sectiondef>
    <location file="a/b.h" line="5" column="1"/>
    <listofallmembers>
      <member refid="structWidgets_1aheight" prot="public" virt="non-virtual"><scope>Widgets</scope><name>height</name></member>
      <member refid="structWidgets_1awidth" prot="public" virt="non-virtual"><scope>Widgets</scope><name>width</name></member>
    </listofallmembers>
  </compounddef>
</doxygen>
"#;

/// Embeds `g` verbatim, as Doxygen does for group members.
pub const GROUP_WIDGETS: &str = r#"<doxygen>
  <compounddef id="group__widgets" kind="group">
    <compoundname>Widgets</compoundname>
    <title>Widget API</title>
    <innerclass refid="structWidgets" prot="public">Widgets</innerclass>
    <sectiondef kind="func">
      <memberdef kind="function" id="a_2b_8h_1ag" prot="public" static="no">
        <type>void</type>
        <name>g</name>
        <location file="a/b.h" line="22" column="6"/>
      </memberdef>
    </sectiondef>
  </compounddef>
</doxygen>
"#;

pub const BROKEN: &str = "<doxygen><compounddef id=\"broken_8h\" kind=\"file\">";

pub fn write_xml(dir: &Path, name: &str, text: &str) {
	fs::write(dir.join(name), text).unwrap();
}

/// Write the whole fixture tree. `missing_8h.xml` is deliberately absent and
/// `broken_8h.xml` is not well-formed.
pub fn write_corpus() -> TempDir {
	let dir = TempDir::new().unwrap();
	let root = dir.path();
	write_xml(root, "index.xml", INDEX);
	write_xml(root, "dir_a.xml", DIR_A);
	write_xml(root, "dir_a_2sub.xml", DIR_A_SUB);
	write_xml(root, "a_2b_8h.xml", FILE_A);
	write_xml(root, "c_2b_8h.xml", FILE_C);
	write_xml(root, "structWidgets.xml", STRUCT_WIDGETS);
	write_xml(root, "group__widgets.xml", GROUP_WIDGETS);
	write_xml(root, "broken_8h.xml", BROKEN);
	dir
}
