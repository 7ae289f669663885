// ============================================================
// Layer 4 — WordprocessingML Text Nodes
// ============================================================
// An event-level view of word/document.xml that exposes only
// what the substitution engine may change: the contents of the
// <w:t> text nodes, grouped by the <w:p> paragraph they sit in.
//
//   <w:p>                                 paragraph 0
//     <w:r><w:t>Company: [PO</w:t></w:r>      node 0
//     <w:hyperlink>
//       <w:r><w:t>INT 2]</w:t>                node 1
//            <w:br/>                          (untouched)
//            <w:t>Address</w:t></w:r>         node 2
//     </w:hyperlink>
//   </w:p>
//
// Each node is one "run" for the engine, so characters never
// move across a <w:br/>, <w:tab/> or field boundary. Nodes are
// collected wherever they appear under a paragraph: plain runs,
// hyperlinks, tracked insertions, content controls, tables at
// any depth. <w:delText> and <w:instrText> are not text nodes
// and are never touched. A paragraph nested inside another one
// (text boxes) owns its own nodes.
//
// Every event is written back as it was read, except the nodes
// whose text was changed.
//
// Reference: quick-xml crate documentation (Reader / Writer)

use std::collections::HashMap;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::domain::document::{Paragraph, Run};
use crate::error::NdaError;

const PARAGRAPH: &[u8] = b"w:p";
const TEXT: &[u8]      = b"w:t";

#[derive(Debug, Clone)]
struct TextNode {
    /// Index of the <w:t> Start (or Empty) event
    start:     usize,
    /// Index of the matching End event; equals `start` for <w:t/>
    end:       usize,
    text:      String,
    rewritten: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WordXml {
    events:     Vec<Event<'static>>,
    nodes:      Vec<TextNode>,
    /// Node indices per paragraph, paragraphs in opening order
    paragraphs: Vec<Vec<usize>>,
}

fn xml_err(e: impl std::fmt::Display) -> NdaError {
    NdaError::Document(format!("malformed document.xml: {e}"))
}

impl WordXml {
    pub fn parse(xml: &[u8]) -> Result<Self, NdaError> {
        let mut reader = Reader::from_reader(xml);

        let mut events     = Vec::new();
        let mut nodes      = Vec::new();
        let mut paragraphs = Vec::<Vec<usize>>::new();
        let mut open_paras = Vec::<usize>::new();
        let mut open_text: Option<(usize, String)> = None;

        loop {
            let event = reader.read_event().map_err(xml_err)?.into_owned();
            let idx   = events.len();

            let mut closed: Option<(usize, usize, String)> = None;
            match &event {
                Event::Eof => break,
                Event::Start(e) if e.name().as_ref() == PARAGRAPH => {
                    open_paras.push(paragraphs.len());
                    paragraphs.push(Vec::new());
                }
                Event::Empty(e) if e.name().as_ref() == PARAGRAPH => {
                    paragraphs.push(Vec::new());
                }
                Event::End(e) if e.name().as_ref() == PARAGRAPH => {
                    open_paras.pop();
                }
                Event::Start(e) if e.name().as_ref() == TEXT => {
                    open_text = Some((idx, String::new()));
                }
                Event::Empty(e) if e.name().as_ref() == TEXT => {
                    closed = Some((idx, idx, String::new()));
                }
                Event::End(e) if e.name().as_ref() == TEXT => {
                    if let Some((start, text)) = open_text.take() {
                        closed = Some((start, idx, text));
                    }
                }
                Event::Text(t) => {
                    if let Some((_, text)) = open_text.as_mut() {
                        text.push_str(&t.unescape().map_err(xml_err)?);
                    }
                }
                Event::CData(c) => {
                    if let Some((_, text)) = open_text.as_mut() {
                        text.push_str(&String::from_utf8_lossy(c));
                    }
                }
                _ => {}
            }

            if let Some((start, end, text)) = closed {
                let node = nodes.len();
                nodes.push(TextNode { start, end, text, rewritten: None });
                if let Some(&para) = open_paras.last() {
                    paragraphs[para].push(node);
                }
            }
            events.push(event);
        }

        Ok(Self { events, nodes, paragraphs })
    }

    /// Every paragraph in document order; each run is one text node
    /// and carries the node's index as its style key.
    pub fn paragraphs(&self) -> Vec<Paragraph<usize>> {
        self.paragraphs
            .iter()
            .map(|ids| {
                Paragraph::new(
                    ids.iter()
                        .map(|&id| Run::new(self.nodes[id].text.clone(), id))
                        .collect(),
                )
            })
            .collect()
    }

    /// Replace the text of one node. Unknown indices are ignored.
    pub fn set_text(&mut self, node: usize, text: String) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.rewritten = if n.text == text { None } else { Some(text) };
        }
    }

    pub fn to_xml(&self) -> Result<Vec<u8>, NdaError> {
        let rewritten: HashMap<usize, &TextNode> = self
            .nodes
            .iter()
            .filter(|n| n.rewritten.is_some())
            .map(|n| (n.start, n))
            .collect();

        let mut writer = Writer::new(Vec::new());
        let mut i      = 0usize;
        while i < self.events.len() {
            match (rewritten.get(&i), &self.events[i]) {
                (Some(node), Event::Start(start) | Event::Empty(start)) => {
                    let text = node.rewritten.as_deref().unwrap_or_default();
                    write_text_node(&mut writer, start, text)?;
                    i = node.end + 1;
                }
                (_, event) => {
                    writer.write_event(event.borrow()).map_err(xml_err)?;
                    i += 1;
                }
            }
        }

        Ok(writer.into_inner())
    }
}

/// `<w:t ...>text</w:t>`, keeping the original attributes. Word
/// drops leading/trailing spaces unless xml:space="preserve".
fn write_text_node(writer: &mut Writer<Vec<u8>>, start: &BytesStart<'_>, text: &str) -> Result<(), NdaError> {
    let mut start = start.clone();
    let edge_space = text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace);
    let preserved  = start.try_get_attribute("xml:space").ok().flatten().is_some();
    if edge_space && !preserved {
        start.push_attribute(("xml:space", "preserve"));
    }

    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    if !text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(text))).map_err(xml_err)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("w:t")))
        .map_err(xml_err)?;
    Ok(())
}
