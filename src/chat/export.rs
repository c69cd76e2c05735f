//! Transcript export to PDF, plain text and JSON.

use std::fmt::Write as _;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{Error, Result};
use crate::types::{ExportFormat, Message};

const TITLE: &str = "UniBot Conversation";
const FILE_STEM: &str = "unibot-conversation";

const PDF_LINES_PER_PAGE: usize = 50;
const PDF_WRAP_COLUMNS: usize = 90;
const PDF_FONT_SIZE: u32 = 10;
const PDF_LEADING: u32 = 14;

/// A serialized transcript ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    /// Format the bytes are in.
    pub format: ExportFormat,
    /// Suggested file name, e.g. `unibot-conversation.pdf`.
    pub file_name: String,
    /// MIME type of the payload.
    pub content_type: &'static str,
    /// The payload.
    pub bytes: Vec<u8>,
}

/// Serializes `messages` in `format`.
///
/// JSON output deserializes back into the same messages. Text and PDF put
/// one entry per message, in order, with its timestamp and author.
pub fn export_conversation(messages: &[Message], format: ExportFormat) -> Result<Export> {
    let bytes = match format {
        ExportFormat::Json => serde_json::to_vec_pretty(messages)?,
        ExportFormat::Txt => render_lines(messages)?.join("\n").into_bytes(),
        ExportFormat::Pdf => render_pdf(&render_lines(messages)?),
    };
    tracing::debug!(%format, messages = messages.len(), bytes = bytes.len(), "exported conversation");
    Ok(Export {
        format,
        file_name: format!("{FILE_STEM}.{}", format.extension()),
        content_type: format.content_type(),
        bytes,
    })
}

fn timestamp(at: OffsetDateTime) -> Result<String> {
    at.format(&Rfc3339)
        .map_err(|err| Error::serialization("failed to format timestamp", Some(Box::new(err))))
}

fn author(message: &Message) -> &'static str {
    if message.is_user() { "You" } else { "UniBot" }
}

fn render_lines(messages: &[Message]) -> Result<Vec<String>> {
    let mut lines = vec![
        TITLE.to_string(),
        format!("Exported: {}", timestamp(OffsetDateTime::now_utc())?),
        String::new(),
    ];
    for message in messages {
        lines.push(format!(
            "[{}] {}: {}",
            timestamp(message.timestamp)?,
            author(message),
            message.text
        ));
    }
    Ok(lines)
}

fn wrap(line: &str, columns: usize) -> Vec<String> {
    let mut out = Vec::new();
    for raw in line.split('\n') {
        let mut current = String::new();
        for word in raw.split(' ') {
            let needed = if current.is_empty() { 0 } else { 1 } + word.chars().count();
            if !current.is_empty() && current.chars().count() + needed > columns {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        out.push(current);
    }
    out
}

fn escape_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Lays `lines` out as a PDF 1.4 document using the built-in Helvetica font.
fn render_pdf(lines: &[String]) -> Vec<u8> {
    let wrapped: Vec<String> = lines
        .iter()
        .flat_map(|line| wrap(line, PDF_WRAP_COLUMNS))
        .collect();
    let pages: Vec<&[String]> = wrapped.chunks(PDF_LINES_PER_PAGE).collect();

    // Objects 1-3 are the catalog, page tree and font; each page then takes
    // a page object followed by its content stream.
    let page_id = |index: usize| 4 + index * 2;
    let mut objects: Vec<String> = Vec::with_capacity(3 + pages.len() * 2);
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", page_id(i))).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());

    for (index, page) in pages.iter().enumerate() {
        let mut content = format!("BT\n/F1 {PDF_FONT_SIZE} Tf\n{PDF_LEADING} TL\n50 770 Td\n");
        for line in page.iter() {
            let _ = writeln!(content, "({}) Tj T*", escape_pdf_text(line));
        }
        content.push_str("ET");
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            page_id(index) + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        let _ = write!(pdf, "{} 0 obj\n{}\nendobj\n", index + 1, body);
    }
    let xref = pdf.len();
    let _ = write!(pdf, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(pdf, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        pdf,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref
    );
    pdf.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn transcript() -> Vec<Message> {
        vec![
            Message::bot("welcome", "Hello! How can I help you today?", Some(Category::General)),
            Message::user("1-1", "How do I reset my password?"),
            Message::bot("1-2", "Use the (IT) password portal.", Some(Category::Technical)),
        ]
    }

    #[test]
    fn json_round_trips() {
        let messages = transcript();
        let export = export_conversation(&messages, ExportFormat::Json).unwrap();
        assert_eq!(export.file_name, "unibot-conversation.json");
        assert_eq!(export.content_type, "application/json");
        let back: Vec<Message> = serde_json::from_slice(&export.bytes).unwrap();
        assert_eq!(back, messages);
    }

    #[test]
    fn text_lists_messages_in_order() {
        let export = export_conversation(&transcript(), ExportFormat::Txt).unwrap();
        assert_eq!(export.file_name, "unibot-conversation.txt");
        let text = String::from_utf8(export.bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "UniBot Conversation");
        assert!(lines[1].starts_with("Exported: "));
        assert!(lines[3].ends_with("UniBot: Hello! How can I help you today?"));
        assert!(lines[4].ends_with("You: How do I reset my password?"));
        assert!(lines[5].ends_with("UniBot: Use the (IT) password portal."));
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn pdf_is_well_formed() {
        let export = export_conversation(&transcript(), ExportFormat::Pdf).unwrap();
        assert_eq!(export.content_type, "application/pdf");
        let pdf = String::from_utf8(export.bytes).unwrap();
        assert!(pdf.starts_with("%PDF-1.4\n"));
        assert!(pdf.ends_with("%%EOF\n"));
        assert!(pdf.contains("(UniBot Conversation) Tj"));
        assert!(pdf.contains("Use the \\(IT\\) password portal."));
        assert!(pdf.contains("/Count 1"));

        let startxref = pdf.rfind("startxref\n").unwrap() + "startxref\n".len();
        let offset: usize = pdf[startxref..].lines().next().unwrap().parse().unwrap();
        assert!(pdf[offset..].starts_with("xref\n"));
        let first = pdf.find("1 0 obj").unwrap();
        assert!(pdf.contains(&format!("{first:010} 00000 n ")));
    }

    #[test]
    fn long_transcripts_span_pages() {
        let messages: Vec<Message> = (0..120)
            .map(|i| Message::user(format!("m{i}"), format!("question {i}")))
            .collect();
        let export = export_conversation(&messages, ExportFormat::Pdf).unwrap();
        let pdf = String::from_utf8(export.bytes).unwrap();
        assert!(pdf.contains("/Count 3"));
    }

    #[test]
    fn wrap_breaks_on_words() {
        let wrapped = wrap("aaaa bbbb cccc", 9);
        assert_eq!(wrapped, vec!["aaaa bbbb", "cccc"]);
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn non_ascii_is_replaced() {
        assert_eq!(escape_pdf_text("café \\ ok"), "caf? \\\\ ok");
    }
}
