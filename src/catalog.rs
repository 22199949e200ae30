//! The fixed set of Nanosyncs configuration fields.
//!
//! The device reports its entire state as a 20-byte block. Each byte position
//! is described here by a [`FieldDef`]: a human-readable name and the ordered
//! enumeration of raw codes the device documents for that position. The
//! catalog is constant for the lifetime of the process and owns no mutable
//! state.
//!
//! Byte 0 is a cursor-position placeholder with no enumeration; it passes
//! through unchanged in the full 0–255 range.

use crate::error::Error;

/// Number of bytes in the configuration block.
pub const CONFIG_LEN: usize = 20;

/// Byte positions of each field within the configuration block.
pub mod field {
    /// Front-panel cursor position placeholder (no semantics).
    pub const CURSOR: usize = 0;
    /// Video reference source.
    pub const VIDEO_REF: usize = 1;
    /// SD video standard.
    pub const VIDEO_STANDARD: usize = 2;
    /// HD video standard.
    pub const HD_STANDARD: usize = 3;
    /// Frame rate.
    pub const FPS: usize = 4;
    /// SDI outputs 1 to 3 definition.
    pub const SDI_OUT_1_TO_3: usize = 5;
    /// SDI output 4 definition.
    pub const SDI_OUT_4: usize = 6;
    /// SDI output 5 definition.
    pub const SDI_OUT_5: usize = 7;
    /// SDI output 6 definition.
    pub const SDI_OUT_6: usize = 8;
    /// Audio reference source.
    pub const AUDIO_REF: usize = 9;
    /// External word clock rate.
    pub const EXTERNAL_WORD_RATE: usize = 10;
    /// External word clock multiplier.
    pub const EXTERNAL_WORD_MULTIPLIER: usize = 11;
    /// External word clock modifier.
    pub const EXTERNAL_WORD_MODIFIER: usize = 12;
    /// External LTC frame rate.
    pub const EXTERNAL_LTC_FPS: usize = 13;
    /// Audio sample rate.
    pub const AUDIO_SAMPLE_RATE: usize = 14;
    /// Audio sample rate pull factor.
    pub const SAMPLE_RATE_MODIFIER: usize = 15;
    /// Word clock outputs 1 to 6 multiplier.
    pub const WORD_MULTIPLIER_1_TO_6: usize = 16;
    /// Word clock outputs 7 to 8 multiplier.
    pub const WORD_MULTIPLIER_7_TO_8: usize = 17;
    /// AES output multiplier.
    pub const AES_MULTIPLIER: usize = 18;
    /// SPDIF output multiplier.
    pub const SPDIF_MULTIPLIER: usize = 19;
}

/// One named byte position within the configuration block.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Human-readable field name, as shown on the device's front panel.
    pub name: &'static str,
    /// Ordered `(raw code, label)` pairs documented for this field.
    ///
    /// Empty for the cursor placeholder at byte 0.
    pub labels: &'static [(u8, &'static str)],
    /// True for the cursor-position placeholder, which has no enumeration
    /// and passes through as a plain integer.
    pub passthrough: bool,
}

impl FieldDef {
    const fn new(name: &'static str, labels: &'static [(u8, &'static str)]) -> Self {
        Self {
            name,
            labels,
            passthrough: false,
        }
    }

    /// Raw code for a label in this field's enumeration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownLabel`] if the label is absent from the
    /// enumeration (always the case for the cursor placeholder).
    pub fn value_for(&self, label: &str) -> Result<u8, Error> {
        self.labels
            .iter()
            .find(|(_, l)| *l == label)
            .map(|(raw, _)| *raw)
            .ok_or_else(|| Error::UnknownLabel {
                field: self.name,
                label: label.to_owned(),
            })
    }

    /// Label for a raw code, or `None` if the code is outside the known
    /// enumeration.
    ///
    /// The device is authoritative and may report reserved or future codes;
    /// those must round-trip rather than fail, so this lookup is total.
    pub fn label_for(&self, raw: u8) -> Option<&'static str> {
        self.labels
            .iter()
            .find(|(r, _)| *r == raw)
            .map(|(_, label)| *label)
    }
}

/// SD/HD definition shared by the four independent SDI-output fields.
const VIDEO_DEFINITION: &[(u8, &str)] = &[(1, "SD"), (2, "HD")];
/// Plain doubler shared by several output multiplier fields.
const X1_X2: &[(u8, &str)] = &[(1, "x1"), (2, "x2")];

/// The fixed ordered list of the 20 field definitions.
pub static CATALOG: [FieldDef; CONFIG_LEN] = [
    FieldDef {
        name: "cursor position",
        labels: &[],
        passthrough: true,
    },
    FieldDef::new(
        "video ref",
        &[
            (1, "internal"),
            (2, "external pal"),
            (3, "external ntsc"),
            (4, "external tri"),
        ],
    ),
    FieldDef::new(
        "video standard",
        &[(1, "ntsc"), (2, "pal 25"), (3, "pal 24"), (4, "pal 23.98")],
    ),
    FieldDef::new(
        "HD standard",
        &[
            (1, "1080i x2 fps"),
            (2, "1080p x1 fps"),
            (3, "1080p x2 fps"),
            (4, "720p x1 fps"),
            (5, "720p x2 fps"),
        ],
    ),
    FieldDef::new(
        "FPS",
        &[
            (1, "23.98 fps"),
            (2, "24 fps"),
            (3, "25 fps"),
            (4, "29.97 fps"),
            (5, "30 fps"),
        ],
    ),
    FieldDef::new("SDI out 1 to 3", VIDEO_DEFINITION),
    FieldDef::new("SDI out 4", VIDEO_DEFINITION),
    FieldDef::new("SDI out 5", VIDEO_DEFINITION),
    FieldDef::new("SDI out 6", VIDEO_DEFINITION),
    FieldDef::new(
        "audio ref",
        &[
            (1, "follow video"),
            (2, "external word clock"),
            (3, "external word 1:1"),
            (4, "LTC"),
        ],
    ),
    FieldDef::new("external word", &[(1, "44.1 khz"), (2, "48 khz")]),
    FieldDef::new("external word multiplier", X1_X2),
    FieldDef::new("external word modifier", &[(1, "1/1"), (2, "+0.1%")]),
    FieldDef::new(
        "external LTC fps",
        &[
            (1, "23.98 fps"),
            (2, "24 fps"),
            (3, "25 fps"),
            (4, "29.97 fps"),
            (5, "30 fps"),
        ],
    ),
    FieldDef::new("audio sample rate", &[(1, "48 khz"), (2, "44.1 khz")]),
    FieldDef::new(
        "sample rate pull factor",
        &[
            (1, "x1"),
            (2, "+4%"),
            (3, "+0.1%"),
            (4, "-0.1%"),
            (5, "-4%"),
        ],
    ),
    FieldDef::new(
        "word mult 1 to 6",
        &[(1, "x1"), (2, "x2"), (3, "x4")],
    ),
    // The device skips code 3 for this field.
    FieldDef::new(
        "word mult 7 to 8",
        &[(1, "x1"), (2, "x2"), (4, "x4"), (5, "x256")],
    ),
    FieldDef::new("AES mult", X1_X2),
    FieldDef::new("SPDIF mult", X1_X2),
];

/// The field definition at a byte position.
///
/// # Errors
///
/// Returns [`Error::FieldIndexOutOfRange`] if `index` is not within the
/// configuration block.
pub fn field_def(index: usize) -> Result<&'static FieldDef, Error> {
    CATALOG.get(index).ok_or(Error::FieldIndexOutOfRange(index))
}

/// The ordered `(raw code, label)` enumeration for a byte position.
///
/// # Errors
///
/// Returns [`Error::FieldIndexOutOfRange`] if `index` is not within the
/// configuration block.
pub fn enumeration_for(index: usize) -> Result<&'static [(u8, &'static str)], Error> {
    field_def(index).map(|def| def.labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_labels_are_unique_within_each_field() {
        for def in &CATALOG {
            for (i, (raw, label)) in def.labels.iter().enumerate() {
                for (other_raw, other_label) in &def.labels[i + 1..] {
                    assert_ne!(raw, other_raw, "duplicate code in {}", def.name);
                    assert_ne!(label, other_label, "duplicate label in {}", def.name);
                }
            }
        }
    }

    #[test]
    fn label_lookup_is_bidirectional() {
        let fps = field_def(field::FPS).unwrap();
        assert_eq!(fps.value_for("29.97 fps").unwrap(), 4);
        assert_eq!(fps.label_for(4), Some("29.97 fps"));
    }

    #[test]
    fn word_mult_7_to_8_skips_code_three() {
        let def = field_def(field::WORD_MULTIPLIER_7_TO_8).unwrap();
        assert_eq!(def.value_for("x4").unwrap(), 4);
        assert_eq!(def.value_for("x256").unwrap(), 5);
        assert_eq!(def.label_for(3), None);
    }

    #[test]
    fn unknown_label_is_rejected_with_field_name() {
        let err = field_def(field::VIDEO_REF)
            .unwrap()
            .value_for("external secam")
            .unwrap_err();
        match err {
            Error::UnknownLabel { field, label } => {
                assert_eq!(field, "video ref");
                assert_eq!(label, "external secam");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn device_reported_codes_outside_the_enumeration_are_none() {
        assert_eq!(field_def(field::VIDEO_REF).unwrap().label_for(9), None);
    }

    #[test]
    fn cursor_placeholder_has_no_enumeration() {
        let cursor = field_def(field::CURSOR).unwrap();
        assert!(cursor.passthrough);
        assert!(cursor.labels.is_empty());
        assert!(cursor.value_for("anything").is_err());
    }

    #[test]
    fn enumeration_for_returns_the_ordered_pairs() {
        assert_eq!(
            enumeration_for(field::FPS).unwrap(),
            [
                (1, "23.98 fps"),
                (2, "24 fps"),
                (3, "25 fps"),
                (4, "29.97 fps"),
                (5, "30 fps"),
            ]
        );
        assert!(enumeration_for(field::CURSOR).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        assert!(matches!(
            field_def(CONFIG_LEN),
            Err(Error::FieldIndexOutOfRange(20))
        ));
        assert!(matches!(
            enumeration_for(CONFIG_LEN),
            Err(Error::FieldIndexOutOfRange(20))
        ));
    }
}
