use crate::config::Config;
use crate::errors::AppError;
use crate::presentation::{signed_caption, signed_on};
use chrono::{Local, NaiveDate};
use common::fields::{render_fields_on, SIGNATURE_TOKEN};
use common::model::document::Document;
use common::signature::SignaturePayload;
use genpdf::elements::{Break, Image as PdfImage, LinearLayout, Paragraph};
use genpdf::style::{Style, StyledString};
use genpdf::Document as PdfDocument;
use image::imageops::FilterType;
use image::{load_from_memory, DynamicImage, GenericImageView};
use log::info;
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::NamedTempFile;

const PAGE_WIDTH_INCH: f64 = 8.5;
const MARGIN_MM: f64 = 10.0;
const IMAGE_DPI: f64 = 150.0;

/// Matches the `max-width: 200px` of the on-screen signature block.
const SIGNATURE_MAX_WIDTH_PX: f64 = 200.0;

/// Line standing in for the signature block until layout.
const SIGNATURE_LINE: &str = "[signature]";

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));
static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(p|div|h[1-6]|li|ul|ol|blockquote|tr)\s*>").expect("valid regex")
});
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li(\s[^>]*)?>").expect("valid regex"));
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)[^>]*>").expect("valid regex"));

/// Where and under which name an export was written.
#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub path: PathBuf,
    pub filename: String,
}

/// Download name: `{template}_{recipient}_{YYYY-MM-DD}.pdf`, path separators
/// replaced.
pub fn export_filename(document: &Document, today: NaiveDate) -> String {
    let name = format!(
        "{}_{}_{}.pdf",
        document.template_name,
        document.recipient_email,
        today.format("%Y-%m-%d")
    );
    name.replace(['/', '\\'], "_")
}

/// Renders a signed document to a PDF file under the export directory.
pub fn export_document_pdf(document: &Document, config: &Config) -> Result<ExportedPdf, AppError> {
    let signature = document.signature.as_ref().ok_or(AppError::NotSigned)?;
    let today = Local::now().date_naive();

    let text = document_text(document, today);
    let mut doc = configure_document(&config.fonts_dir, &document.template_name)?;
    let caption = signed_caption(signed_on(document, today));

    // Keep temporary files alive until rendering finishes
    let mut temp_files: Vec<NamedTempFile> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            doc.push(Break::new(1));
            continue;
        }

        if line == SIGNATURE_LINE {
            handle_signature_line(signature, &caption, &mut temp_files, &mut doc)?;
            continue;
        }

        if let Some(item) = line.strip_prefix("- ") {
            handle_list_item(&mut doc, item);
            continue;
        }

        doc.push(parse_styled_paragraph(line));
    }

    std::fs::create_dir_all(&config.export_dir).map_err(|e| AppError::Export(e.to_string()))?;
    let filename = export_filename(document, today);
    let path = config.export_dir.join(&filename);
    let mut out_file = std::fs::File::create(&path).map_err(|e| AppError::Export(e.to_string()))?;
    doc.render(&mut out_file)?;

    info!("Exported document {} to {}", document.id, path.display());
    Ok(ExportedPdf { path, filename })
}

/// Field-substituted content as plain lines, with the first signature token
/// on a line of its own.
fn document_text(document: &Document, today: NaiveDate) -> String {
    let mut html = render_fields_on(&document.content, &document.fields, today);
    if document.has_signature_field() {
        html = html.replacen(SIGNATURE_TOKEN, &format!("\n{}\n", SIGNATURE_LINE), 1);
    }
    html_to_text(&html)
}

/// Flattens editor markup into lines. Block ends become line breaks, list
/// items get a `- ` prefix, bold and italic survive as `<b>`/`<i>`, every
/// other tag is dropped and common entities are decoded.
pub fn html_to_text(html: &str) -> String {
    let text = LINE_BREAK.replace_all(html, "\n");
    let text = BLOCK_END.replace_all(&text, "\n");
    let text = LIST_ITEM.replace_all(&text, "- ");
    let text = ANY_TAG.replace_all(&text, |caps: &regex::Captures| {
        let closing = &caps[1];
        match caps[2].to_ascii_lowercase().as_str() {
            "b" | "strong" => format!("<{}b>", closing),
            "i" | "em" => format!("<{}i>", closing),
            _ => String::new(),
        }
    });

    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Load the font family from the configured directory.
fn load_font(
    fonts_dir: &Path,
) -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>, AppError> {
    if let Ok(family) = genpdf::fonts::from_files(fonts_dir, "Arial", None) {
        return Ok(family);
    }
    Ok(genpdf::fonts::from_files(fonts_dir, "LiberationSans", None)?)
}

fn configure_document(fonts_dir: &Path, title: &str) -> Result<PdfDocument, AppError> {
    let font_family = load_font(fonts_dir)?;
    let mut doc = PdfDocument::new(font_family);
    doc.set_title(title);

    // 14px on screen is 10.5pt
    doc.set_font_size((14.0_f32 * 0.75_f32).round() as u8);
    doc.set_line_spacing(1.6f64);

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

fn handle_list_item(doc: &mut PdfDocument, item_text: &str) {
    let mut p = Paragraph::new("");
    p.push(StyledString::new("• ", Style::new()));
    push_styled_text(&mut p, item_text);
    let mut layout = LinearLayout::vertical();
    layout.push(p);
    doc.push(layout);
}

/// Embeds the signature scaled like the on-screen block, flattened over
/// white, followed by the signing caption.
fn handle_signature_line(
    signature: &SignaturePayload,
    caption: &str,
    temp_files: &mut Vec<NamedTempFile>,
    doc: &mut PdfDocument,
) -> Result<(), AppError> {
    let bytes = signature
        .image_bytes()
        .map_err(|e| AppError::Export(e.to_string()))?;
    let img = load_from_memory(&bytes).map_err(|e| AppError::Export(e.to_string()))?;
    let (orig_w, orig_h) = img.dimensions();
    let orig_w_f = orig_w as f64;

    let margin_in = MARGIN_MM / 25.4_f64;
    let content_target_px = (PAGE_WIDTH_INCH - 2.0 * margin_in) * IMAGE_DPI;
    // CSS px -> image px at IMAGE_DPI, 96 CSS px per inch
    let css_max_width_target_px = SIGNATURE_MAX_WIDTH_PX * IMAGE_DPI / 96.0;

    let scale = (content_target_px / orig_w_f)
        .min(css_max_width_target_px / orig_w_f)
        .min(1.0);

    let resized: DynamicImage = if scale >= 1.0 {
        img
    } else {
        let new_w = (orig_w_f * scale).max(1.0).round() as u32;
        let new_h = (orig_h as f64 * scale).max(1.0).round() as u32;
        img.resize(new_w, new_h, FilterType::Lanczos3)
    };

    let rgba = resized.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut background = image::RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut background, &rgba, 0, 0);
    let raw = DynamicImage::ImageRgba8(background).to_rgb8().into_raw();

    let mut tmp = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .map_err(|e| AppError::Export(e.to_string()))?;
    {
        let file = tmp.as_file_mut();
        let mut encoder = PngEncoder::new(file, w, h);
        encoder.set_color(PngColorType::Rgb);
        encoder.set_depth(PngBitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| AppError::Export(e.to_string()))?;
        writer
            .write_image_data(&raw)
            .map_err(|e| AppError::Export(e.to_string()))?;
    }

    let mut img_elem = PdfImage::from_path(tmp.path())?;
    img_elem.set_dpi(IMAGE_DPI);
    temp_files.push(tmp);
    doc.push(img_elem);
    doc.push(Paragraph::new(StyledString::new(
        caption.to_string(),
        Style::new().italic(),
    )));
    Ok(())
}

/// Find next `<b>` or `<i>` in text, returning tag name and index.
fn find_next_tag(text: &str) -> Option<(&str, usize)> {
    let b_pos = text.find("<b>");
    let i_pos = text.find("<i>");
    match (b_pos, i_pos) {
        (Some(b), Some(i)) if b < i => Some(("b", b)),
        (Some(_), Some(i)) => Some(("i", i)),
        (Some(b), None) => Some(("b", b)),
        (None, Some(i)) => Some(("i", i)),
        (None, None) => None,
    }
}

fn parse_styled_paragraph(text: &str) -> Paragraph {
    let mut paragraph = Paragraph::new("");
    push_styled_text(&mut paragraph, text);
    paragraph
}

/// Pushes one line with `<b>...</b>` / `<i>...</i>` into a paragraph. A
/// missing closing tag leaves the rest as plain text.
fn push_styled_text(paragraph: &mut Paragraph, text: &str) {
    let mut rest = text;

    while let Some((next_tag, start)) = find_next_tag(rest) {
        if start > 0 {
            paragraph.push(&rest[..start]);
        }

        let (tag_open, tag_close, style) = match next_tag {
            "b" => ("<b>", "</b>", Style::new().bold()),
            _ => ("<i>", "</i>", Style::new().italic()),
        };

        if let Some(rel_end) = rest[start + tag_open.len()..].find(tag_close) {
            let styled_text = &rest[start + tag_open.len()..start + tag_open.len() + rel_end];
            paragraph.push(StyledString::new(styled_text, style));
            rest = &rest[start + tag_open.len() + rel_end + tag_close.len()..];
        } else {
            paragraph.push(&rest[start..]);
            return;
        }
    }

    if !rest.is_empty() {
        paragraph.push(rest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::model::template::Template;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn document(content: &str) -> Document {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let t = Template::new("t".into(), "Vertrag/2024".into(), content.into(), now);
        let fields = BTreeMap::from([("Name".to_string(), "A & B".to_string())]);
        Document::from_template("d".into(), &t, fields, "a@b.de".into(), now)
    }

    #[test]
    fn markup_becomes_lines() {
        let text = html_to_text(
            "<h1>Titel</h1><p>Hallo <strong>Welt</strong> &amp; <em>du</em></p>\
             <ul><li>eins</li><li>zwei</li></ul><p>a<br/>b</p>",
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Titel",
                "Hallo <b>Welt</b> & <i>du</i>",
                "- eins",
                "- zwei",
                "",
                "a",
                "b"
            ]
        );
    }

    #[test]
    fn signature_token_gets_its_own_line() {
        let doc = document("<p>Hallo {Name}</p><p>Ort: {UNTERSCHRIFT} Ende</p>");
        let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let text = document_text(&doc, today);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Hallo A & B", "Ort: ", SIGNATURE_LINE, " Ende"]);
    }

    #[test]
    fn filename_has_no_path_separators() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(
            export_filename(&document("x"), today),
            "Vertrag_2024_a@b.de_2024-01-02.pdf"
        );
    }

    #[test]
    fn unsigned_document_is_not_exported() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            export_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let err = export_document_pdf(&document("{UNTERSCHRIFT}"), &config).unwrap_err();
        assert!(matches!(err, AppError::NotSigned));
    }

    #[test]
    fn missing_fonts_is_an_export_error() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            export_dir: dir.path().join("out"),
            fonts_dir: dir.path().join("no-fonts"),
            ..Config::default()
        };
        let mut doc = document("{UNTERSCHRIFT}");
        doc.sign(
            SignaturePayload::from_data_url("data:image/png;base64,AAAA"),
            Utc::now(),
        );

        let err = export_document_pdf(&doc, &config).unwrap_err();
        assert!(matches!(err, AppError::Export(_)));
        assert!(!dir.path().join("out").exists());
    }
}
