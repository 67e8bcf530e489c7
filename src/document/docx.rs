/*!
 * WordprocessingML (.docx) reading and writing.
 *
 * Reading only needs paragraph text: the main part is scanned for paragraphs
 * and their text, tab and break elements. Writing produces a minimal package
 * with the document, styles, an optional page-number footer and core
 * properties.
 */

use std::fmt::Display;
use std::io::{Cursor, Read, Write};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::document::model::{Alignment, Paragraph, Run, RunContent, ScriptDocument};
use crate::errors::DocumentError;

const MAIN_PART: &str = "word/document.xml";

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

static PARAGRAPH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*)?/>|<w:p(?:\s[^>]*)?>.*?</w:p>").expect("Invalid paragraph regex")
});

static PARAGRAPH_PROPERTIES_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:pPr(?:\s[^>]*)?/>|<w:pPr(?:\s[^>]*)?>.*?</w:pPr>")
        .expect("Invalid paragraph properties regex")
});

static TEXT_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab(?:\s[^>]*)?/>|<w:(?:br|cr)(?:\s[^>]*)?/>")
        .expect("Invalid text token regex")
});

/// Plain text of every paragraph in a .docx package, in document order.
///
/// Line breaks inside a paragraph start a new entry, so a transcript pasted
/// as one soft-wrapped paragraph still yields one entry per line.
pub fn read_paragraphs(bytes: &[u8]) -> Result<Vec<String>, DocumentError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut xml = String::new();
    {
        let mut part = archive
            .by_name(MAIN_PART)
            .map_err(|_| DocumentError::InputFormat(format!("missing {}", MAIN_PART)))?;
        part.read_to_string(&mut xml)
            .map_err(|e| DocumentError::InputFormat(format!("{} is not UTF-8 text: {}", MAIN_PART, e)))?;
    }

    let mut paragraphs = Vec::new();
    for paragraph in PARAGRAPH_REGEX.find_iter(&xml) {
        let body = PARAGRAPH_PROPERTIES_REGEX.replace_all(paragraph.as_str(), "");
        let mut line = String::new();

        for token in TEXT_TOKEN_REGEX.captures_iter(&body) {
            match token.get(1) {
                Some(text) => line.push_str(&decode_entities(text.as_str())),
                None if token[0].starts_with("<w:tab") => line.push('\t'),
                None => paragraphs.push(std::mem::take(&mut line)),
            }
        }
        paragraphs.push(line);
    }

    debug!("Read {} paragraphs from {}", paragraphs.len(), MAIN_PART);
    Ok(paragraphs)
}

/// Serialize a document to .docx bytes
pub fn write_document(document: &ScriptDocument) -> Result<Vec<u8>, DocumentError> {
    let page_numbers = document.properties.page_numbers;
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opt = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let parts: Vec<(&str, String)> = vec![
        ("[Content_Types].xml", content_types_xml(page_numbers)),
        ("_rels/.rels", package_rels_xml().to_string()),
        ("docProps/core.xml", core_properties_xml(document.properties.title.as_deref())),
        (MAIN_PART, document_xml(document)),
        ("word/_rels/document.xml.rels", document_rels_xml(page_numbers)),
        ("word/styles.xml", styles_xml(document)),
    ];

    for (name, content) in &parts {
        zip.start_file(*name, opt).map_err(write_error)?;
        zip.write_all(content.as_bytes()).map_err(write_error)?;
    }
    if page_numbers {
        zip.start_file("word/footer1.xml", opt).map_err(write_error)?;
        zip.write_all(footer_xml().as_bytes()).map_err(write_error)?;
    }

    let bytes = zip.finish().map_err(write_error)?.into_inner();
    debug!(
        "Serialized {} paragraphs into {} bytes",
        document.paragraphs().len(),
        bytes.len()
    );
    Ok(bytes)
}

fn write_error(e: impl Display) -> DocumentError {
    DocumentError::Write(e.to_string())
}

fn document_xml(document: &ScriptDocument) -> String {
    let mut body = String::new();
    for paragraph in document.paragraphs() {
        write_paragraph(&mut body, paragraph);
    }

    let footer_reference = if document.properties.page_numbers {
        r#"<w:footerReference w:type="default" r:id="rId2"/>"#
    } else {
        ""
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}">
  <w:body>
{body}    <w:sectPr>
      {footer_reference}
      <w:pgSz w:w="12240" w:h="15840"/>
      <w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>
    </w:sectPr>
  </w:body>
</w:document>"#
    )
}

fn write_paragraph(out: &mut String, paragraph: &Paragraph) {
    out.push_str("    <w:p>");

    let mut properties = String::new();
    if !paragraph.tab_stops.is_empty() {
        properties.push_str("<w:tabs>");
        for position in &paragraph.tab_stops {
            properties.push_str(&format!(r#"<w:tab w:val="left" w:pos="{}"/>"#, position));
        }
        properties.push_str("</w:tabs>");
    }
    if let Some(spacing) = paragraph.spacing {
        properties.push_str(&format!(
            r#"<w:spacing w:after="{}" w:line="{}" w:lineRule="auto"/>"#,
            points_to_twips(spacing.after_pt),
            (spacing.line * 240.0).round() as u32
        ));
    }
    if let Some(indent) = paragraph.indent {
        properties.push_str(&format!(r#"<w:ind w:left="{}""#, indent.left_twips));
        if indent.hanging_twips > 0 {
            properties.push_str(&format!(r#" w:hanging="{}""#, indent.hanging_twips));
        }
        properties.push_str("/>");
    }
    match paragraph.alignment {
        Alignment::Left => {}
        Alignment::Center => properties.push_str(r#"<w:jc w:val="center"/>"#),
        Alignment::Right => properties.push_str(r#"<w:jc w:val="right"/>"#),
    }
    if !properties.is_empty() {
        out.push_str("<w:pPr>");
        out.push_str(&properties);
        out.push_str("</w:pPr>");
    }

    for run in &paragraph.runs {
        write_run(out, run);
    }
    out.push_str("</w:p>\n");
}

fn write_run(out: &mut String, run: &Run) {
    out.push_str("<w:r>");

    let mut properties = String::new();
    if let Some(font) = &run.font_name {
        let font = xml_escape(font);
        properties.push_str(&format!(
            r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:eastAsia="{font}" w:cs="{font}"/>"#
        ));
    }
    if run.bold {
        properties.push_str("<w:b/>");
    }
    if run.italic {
        properties.push_str("<w:i/>");
    }
    if let Some(color) = run.color {
        properties.push_str(&format!(r#"<w:color w:val="{}"/>"#, color.to_hex()));
    }
    if let Some(size) = run.size_pt {
        let half_points = (size * 2.0).round() as u32;
        properties.push_str(&format!(r#"<w:sz w:val="{half_points}"/><w:szCs w:val="{half_points}"/>"#));
    }
    if let Some(highlight) = run.highlight {
        properties.push_str(&format!(
            r#"<w:shd w:val="clear" w:color="auto" w:fill="{}"/>"#,
            highlight.to_hex()
        ));
    }
    if !properties.is_empty() {
        out.push_str("<w:rPr>");
        out.push_str(&properties);
        out.push_str("</w:rPr>");
    }

    match &run.content {
        RunContent::Tab => out.push_str("<w:tab/>"),
        RunContent::Text(text) => {
            // Word drops a bare tab character inside w:t, so tabs become elements
            for (i, piece) in text.split('\t').enumerate() {
                if i > 0 {
                    out.push_str("<w:tab/>");
                }
                if !piece.is_empty() {
                    out.push_str(r#"<w:t xml:space="preserve">"#);
                    out.push_str(&xml_escape(piece));
                    out.push_str("</w:t>");
                }
            }
        }
    }
    out.push_str("</w:r>");
}

fn points_to_twips(points: f32) -> u32 {
    (points * 20.0).round().max(0.0) as u32
}

fn content_types_xml(page_numbers: bool) -> String {
    let footer = if page_numbers {
        r#"
  <Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>"#
    } else {
        ""
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>{footer}
</Types>"#
    )
}

fn package_rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#
}

fn document_rels_xml(page_numbers: bool) -> String {
    let footer = if page_numbers {
        r#"
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>"#
    } else {
        ""
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>{footer}
</Relationships>"#
    )
}

fn styles_xml(document: &ScriptDocument) -> String {
    let defaults = match &document.properties.default_font {
        Some((name, size)) => {
            let name = xml_escape(name);
            let half_points = (size * 2.0).round() as u32;
            format!(
                r#"
  <w:docDefaults>
    <w:rPrDefault>
      <w:rPr>
        <w:rFonts w:ascii="{name}" w:hAnsi="{name}" w:eastAsia="{name}" w:cs="{name}"/>
        <w:sz w:val="{half_points}"/>
        <w:szCs w:val="{half_points}"/>
      </w:rPr>
    </w:rPrDefault>
  </w:docDefaults>"#
            )
        }
        None => String::new(),
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{W_NS}">{defaults}
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Footer">
    <w:name w:val="footer"/>
    <w:basedOn w:val="Normal"/>
  </w:style>
</w:styles>"#
    )
}

fn footer_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:ftr xmlns:w="{W_NS}" xmlns:r="{R_NS}">
  <w:p>
    <w:pPr><w:pStyle w:val="Footer"/><w:jc w:val="right"/></w:pPr>
    <w:r><w:fldChar w:fldCharType="begin"/></w:r>
    <w:r><w:instrText xml:space="preserve"> PAGE </w:instrText></w:r>
    <w:r><w:fldChar w:fldCharType="separate"/></w:r>
    <w:r><w:t>1</w:t></w:r>
    <w:r><w:fldChar w:fldCharType="end"/></w:r>
  </w:p>
</w:ftr>"#
    )
}

fn core_properties_xml(title: Option<&str>) -> String {
    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let title = title
        .map(|t| format!("\n  <dc:title>{}</dc:title>", xml_escape(t)))
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">{title}
  <dc:creator>{creator}</dc:creator>
  <dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created>
  <dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified>
</cp:coreProperties>"#,
        creator = env!("CARGO_PKG_NAME"),
    )
}

/// Escape text for element content and attribute values
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decode the predefined XML entities and numeric character references.
/// Unknown or malformed references are kept as written.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 12)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|ch| (ch, semi)));

        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
