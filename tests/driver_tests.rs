//! Integration tests for the smart-leds strip adapter

use smart_leds::{RGB8, SmartLedsWrite};
use strip_sequencer::{Color, SmartLedStrip, StripDriver};

/// Writer that records every frame it is asked to send
struct RecordingWriter {
    frames: Vec<Vec<RGB8>>,
    fail: bool,
}

impl RecordingWriter {
    fn new() -> Self {
        Self {
            frames: Vec::new(),
            fail: false,
        }
    }
}

impl SmartLedsWrite for RecordingWriter {
    type Error = ();
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.frames.push(iterator.into_iter().map(Into::into).collect());
        if self.fail { Err(()) } else { Ok(()) }
    }
}

#[test]
fn fill_then_show_writes_whole_frame() {
    let mut strip = SmartLedStrip::<_, 5>::new(RecordingWriter::new());
    strip.fill(Color::new(10, 20, 30), 1, 2);
    strip.show();

    let writer = strip.into_inner();
    assert_eq!(writer.frames.len(), 1);
    assert_eq!(
        writer.frames[0],
        [
            RGB8::new(0, 0, 0),
            RGB8::new(10, 20, 30),
            RGB8::new(10, 20, 30),
            RGB8::new(0, 0, 0),
            RGB8::new(0, 0, 0),
        ]
    );
}

#[test]
fn fill_past_end_is_clipped() {
    let mut strip = SmartLedStrip::<_, 3>::new(RecordingWriter::new());
    strip.fill(Color::new(1, 2, 3), 2, 10);
    strip.fill(Color::new(9, 9, 9), 7, 1);
    strip.fill(Color::new(9, 9, 9), usize::MAX, 5);

    assert_eq!(
        strip.pixels(),
        &[RGB8::new(0, 0, 0), RGB8::new(0, 0, 0), RGB8::new(1, 2, 3)]
    );
}

#[test]
fn brightness_is_applied_on_show() {
    let mut strip = SmartLedStrip::<_, 2>::new(RecordingWriter::new());
    strip.fill(Color::new(200, 100, 50), 0, 2);

    strip.show();
    strip.set_brightness(0);
    assert_eq!(strip.brightness(), 0);
    strip.show();

    // The buffer keeps full-scale colours; only the transmitted frame is dimmed
    assert_eq!(strip.pixels()[0], RGB8::new(200, 100, 50));
    let writer = strip.into_inner();
    assert_eq!(writer.frames[0], [RGB8::new(200, 100, 50); 2]);
    assert_eq!(writer.frames[1], [RGB8::new(0, 0, 0); 2]);
}

#[test]
fn clear_blanks_and_shows() {
    let mut strip = SmartLedStrip::<_, 4>::new(RecordingWriter::new());
    strip.fill(Color::new(255, 255, 255), 0, 4);
    strip.clear();

    assert_eq!(strip.len(), 4);
    let writer = strip.into_inner();
    assert_eq!(writer.frames, [vec![RGB8::new(0, 0, 0); 4]]);
}

#[test]
fn write_failure_does_not_panic() {
    let mut writer = RecordingWriter::new();
    writer.fail = true;
    let mut strip = SmartLedStrip::<_, 2>::new(writer);
    strip.fill(Color::new(1, 1, 1), 0, 2);
    strip.show();
    strip.show();
    assert_eq!(strip.into_inner().frames.len(), 2);
}
