use crate::pipeline::prediction_cache::Prediction;
use crate::pipeline::render_state::RenderState;
use crate::pipeline::throttled_predictor::AgeEstimate;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

const BOX_COLOR: [u8; 3] = [0, 90, 255];
const LABEL_COLOR: [u8; 3] = [255, 0, 0];

const GLYPH_ROWS: usize = 5;
const LABEL_SCALE: i32 = 2;
/// Glyph cell is 3 columns wide plus one column of spacing.
const GLYPH_ADVANCE: i32 = 4;
const LABEL_MARGIN: i32 = 4;

/// Draws the per-frame overlay directly into the output frame.
///
/// Text uses a built-in 3x5 pixel font so no font assets ship with the
/// binary. Every drawing primitive clips against the frame bounds, so a
/// box hugging the frame edge renders partially instead of panicking.
pub fn render(frame: &mut Frame, state: &RenderState) {
    match state {
        RenderState::NoFace => {
            let text = "NO FACE FOUND";
            let x = (frame.width() as i32 - text_width(text, LABEL_SCALE)) / 2;
            let y = (frame.height() as i32 - GLYPH_ROWS as i32 * LABEL_SCALE) / 2;
            draw_text(frame, x, y, text, LABEL_SCALE, LABEL_COLOR);
        }
        RenderState::Face(face) => {
            draw_box(frame, &face.region, BOX_COLOR);
            let label = label_for(&face.estimate);
            let text_h = GLYPH_ROWS as i32 * LABEL_SCALE;
            // Above the box when there is room, inside its top edge otherwise.
            let mut y = face.region.y as i32 - text_h - LABEL_MARGIN;
            if y < 0 {
                y = face.region.y as i32 + LABEL_MARGIN;
            }
            draw_text(frame, face.region.x as i32, y, &label, LABEL_SCALE, LABEL_COLOR);
        }
    }
}

fn label_for(estimate: &AgeEstimate) -> String {
    match estimate {
        AgeEstimate::Loading => "LOADING MODEL".to_string(),
        AgeEstimate::Predicted(Prediction::Age(age)) => format!("AGE {age}"),
        AgeEstimate::Predicted(Prediction::Unavailable) => "AGE UNAVAILABLE".to_string(),
    }
}

/// One-pixel rectangle outline, clipped to the frame.
fn draw_box(frame: &mut Frame, region: &Region, color: [u8; 3]) {
    let x1 = region.x as i32;
    let y1 = region.y as i32;
    let x2 = x1 + region.width as i32 - 1;
    let y2 = y1 + region.height as i32 - 1;

    for x in x1..=x2 {
        put_pixel_clipped(frame, x, y1, color);
        put_pixel_clipped(frame, x, y2, color);
    }
    for y in y1..=y2 {
        put_pixel_clipped(frame, x1, y, color);
        put_pixel_clipped(frame, x2, y, color);
    }
}

fn put_pixel_clipped(frame: &mut Frame, x: i32, y: i32, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < frame.width() && (y as u32) < frame.height() {
        frame.put_pixel(x as u32, y as u32, color);
    }
}

pub(crate) fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * GLYPH_ADVANCE * scale
}

fn draw_text(frame: &mut Frame, x: i32, y: i32, text: &str, scale: i32, color: [u8; 3]) {
    let mut cursor_x = x;
    for ch in text.chars() {
        draw_char(frame, cursor_x, y, ch, scale, color);
        cursor_x += GLYPH_ADVANCE * scale;
    }
}

fn draw_char(frame: &mut Frame, x: i32, y: i32, ch: char, scale: i32, color: [u8; 3]) {
    let bitmap: [u8; GLYPH_ROWS] = match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        _ => [0b000; GLYPH_ROWS],
    };

    for (row, bits) in bitmap.iter().enumerate() {
        for col in 0..3 {
            if (bits >> (2 - col)) & 1 == 1 {
                for dy in 0..scale {
                    for dx in 0..scale {
                        put_pixel_clipped(
                            frame,
                            x + col * scale + dx,
                            y + row as i32 * scale + dy,
                            color,
                        );
                    }
                }
            }
        }
    }
}
