//! SVG element rendering
//!
//! Each function returns one self-contained SVG element as a string. All
//! lengths are written with the `mm` unit so the printed page keeps its
//! physical scale.

/// Stroke width of every line on the sheet
pub const STROKE_WIDTH: &str = ".1mm";

pub fn mm(value: f64) -> String {
    format!("{}mm", value)
}

/// Escape text content and attribute values
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
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

pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> String {
    format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="black" stroke-width="{}" />"#,
        mm(x1),
        mm(y1),
        mm(x2),
        mm(y2),
        STROKE_WIDTH
    )
}

pub fn circle(cx: f64, cy: f64, r: f64, fill: &str) -> String {
    format!(
        r#"<circle cx="{}" cy="{}" r="{}" fill="{}" />"#,
        mm(cx),
        mm(cy),
        mm(r),
        fill
    )
}

pub fn text(content: &str, x: f64, y: f64, size: f64, fill: &str) -> String {
    format!(
        r#"<text x="{}" y="{}" fill="{}" font-size="{}">{}</text>"#,
        mm(x),
        mm(y),
        fill,
        mm(size),
        escape_text(content)
    )
}

/// Two crossing lines of length `size` centred on (x, y)
pub fn cross(x: f64, y: f64, size: f64) -> [String; 2] {
    let half = size / 2.0;
    [line(x - half, y, x + half, y), line(x, y - half, x, y + half)]
}
