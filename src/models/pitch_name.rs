// Pitch names used for track labels and transposition reports

/// Pitch class names, sharps only
pub const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Name a MIDI note number, e.g. 60 -> "C3"
///
/// Octave numbering puts middle C (60) in octave 3, matching the labels
/// printed on music box strips. Negative numbers (possible after a large
/// downward transposition) still get a name.
pub fn note_name(pitch: i32) -> String {
    let class = pitch.rem_euclid(12) as usize;
    let octave = pitch.div_euclid(12) - 2;
    format!("{}{}", NOTE_NAMES[class], octave)
}
