// src/certificate.rs

use std::fs;
use std::path::{Path, PathBuf};

use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions,
    Point, Polygon, PolygonRing, Pt, Rgb, TextItem, WindingOrder,
};

use crate::{error::AppError, models::result::CertificateFields};

// Letter-size page, coordinates in millimetres from the bottom-left corner.
const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const INCH: f32 = 25.4;

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb {
        r,
        g,
        b,
        icc_profile: None,
    })
}

/// Deterministic artifact name for a recipient. Re-issuing a certificate
/// for the same name overwrites the previous file.
pub fn file_name(recipient: &str) -> String {
    let safe: String = recipient
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}_certificate.pdf", safe)
}

/// Renders the single-page certificate for a finalized session.
/// The score line is green for a passed session and red otherwise.
pub fn render(fields: &CertificateFields) -> Vec<u8> {
    let mut document = PdfDocument::new("Certificate of Achievement");
    let mut ops = Vec::new();

    let ink = rgb(0.0, 0.0, 0.0);
    let title_color = rgb(0.0, 0.0, 0.55);
    let score_color = if fields.passed {
        rgb(0.0, 0.5, 0.0)
    } else {
        rgb(0.8, 0.0, 0.0)
    };

    push_border(&mut ops, &ink);

    push_centered_text(
        &mut ops,
        PAGE_HEIGHT - 1.5 * INCH,
        BuiltinFont::HelveticaBold,
        30.0,
        "Certificate of Achievement".to_string(),
        &title_color,
    );
    push_centered_text(
        &mut ops,
        PAGE_HEIGHT - 2.5 * INCH,
        BuiltinFont::Helvetica,
        18.0,
        format!("Presented to {}", fields.recipient_name),
        &ink,
    );
    push_centered_text(
        &mut ops,
        PAGE_HEIGHT - 3.5 * INCH,
        BuiltinFont::Helvetica,
        16.0,
        "For successfully completing the quiz".to_string(),
        &ink,
    );
    push_centered_text(
        &mut ops,
        PAGE_HEIGHT - 4.5 * INCH,
        BuiltinFont::HelveticaBold,
        16.0,
        format!("Your Score: {} out of {}", fields.score, fields.total),
        &score_color,
    );
    push_centered_text(
        &mut ops,
        PAGE_HEIGHT - 5.5 * INCH,
        BuiltinFont::Helvetica,
        12.0,
        format!("Date: {}", fields.issued_date.format("%B %d, %Y")),
        &ink,
    );

    // Signature placeholder, bottom left.
    push_text(
        &mut ops,
        Point::new(Mm(1.5 * INCH), Mm(1.5 * INCH)),
        BuiltinFont::Helvetica,
        14.0,
        "________________________".to_string(),
        &ink,
    );
    push_text(
        &mut ops,
        Point::new(Mm(1.5 * INCH), Mm(1.2 * INCH)),
        BuiltinFont::Helvetica,
        14.0,
        "Signature".to_string(),
        &ink,
    );

    let page = PdfPage::new(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), ops);
    let mut warnings = Vec::new();
    document
        .with_pages(vec![page])
        .save(&PdfSaveOptions::default(), &mut warnings)
}

/// Renders and writes the certificate into `dir`, overwriting any previous
/// issue for the same recipient. Returns the written path.
pub fn write(dir: &Path, fields: &CertificateFields) -> Result<PathBuf, AppError> {
    let bytes = render(fields);
    let path = dir.join(file_name(&fields.recipient_name));

    fs::create_dir_all(dir).map_err(|e| AppError::ArtifactWrite(e.to_string()))?;
    fs::write(&path, bytes).map_err(|e| AppError::ArtifactWrite(e.to_string()))?;

    Ok(path)
}

/// Stroked border, half an inch in from every page edge.
fn push_border(ops: &mut Vec<Op>, color: &Color) {
    let inset = 0.5 * INCH;
    let ring = PolygonRing {
        points: vec![
            LinePoint {
                p: Point::new(Mm(inset), Mm(inset)),
                bezier: false,
            },
            LinePoint {
                p: Point::new(Mm(PAGE_WIDTH - inset), Mm(inset)),
                bezier: false,
            },
            LinePoint {
                p: Point::new(Mm(PAGE_WIDTH - inset), Mm(PAGE_HEIGHT - inset)),
                bezier: false,
            },
            LinePoint {
                p: Point::new(Mm(inset), Mm(PAGE_HEIGHT - inset)),
                bezier: false,
            },
        ],
    };
    ops.push(Op::SetOutlineColor { col: color.clone() });
    ops.push(Op::SetOutlineThickness { pt: Pt(4.0) });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![ring],
            mode: PaintMode::Stroke,
            winding_order: WindingOrder::NonZero,
        },
    });
}

fn push_text(
    ops: &mut Vec<Op>,
    pos: Point,
    font: BuiltinFont,
    font_size: f32,
    text: String,
    color: &Color,
) {
    ops.extend([
        Op::StartTextSection,
        Op::SetTextCursor { pos },
        Op::SetFontSizeBuiltinFont {
            size: Pt(font_size),
            font,
        },
        Op::SetFillColor { col: color.clone() },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text)],
            font,
        },
        Op::EndTextSection,
    ]);
}

fn push_centered_text(
    ops: &mut Vec<Op>,
    y: f32,
    font: BuiltinFont,
    font_size: f32,
    text: String,
    color: &Color,
) {
    // Rough Helvetica advance (about half the point size per glyph),
    // converted to millimetres. Close enough to visually center one line.
    let width = text.chars().count() as f32 * font_size * 0.5 * (25.4 / 72.0);
    let x = ((PAGE_WIDTH - width) / 2.0).max(0.0);
    push_text(ops, Point::new(Mm(x), Mm(y)), font, font_size, text, color);
}
