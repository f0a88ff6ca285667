//! Pad code partitioning between the grid's note space and the function
//! buttons' CC space.

/// First pad code that addresses a side/top function button.
const FIRST_FUNCTION_PAD: u8 = 0x5B;

/// CC number of the first function button in the host's vocabulary.
const FIRST_FUNCTION_CC: u8 = 0x68;

/// Host-side target for a raw controller pad code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadTarget {
    /// A playable grid cell, forwarded as a note with the same number.
    Note(u8),
    /// A function button, forwarded as a control change.
    Control(u8),
}

/// Map a raw pad code (0-127) to its host-side target.
///
/// Pure and total; the lower range is the playable grid, the upper range the
/// function buttons addressed via CC on the host side.
pub fn map(pad: u8) -> PadTarget {
    if pad < FIRST_FUNCTION_PAD {
        PadTarget::Note(pad)
    } else {
        PadTarget::Control(pad - FIRST_FUNCTION_PAD + FIRST_FUNCTION_CC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grid_cells_stay_notes() {
        assert_eq!(map(0), PadTarget::Note(0));
        assert_eq!(map(10), PadTarget::Note(10));
        assert_eq!(map(0x5A), PadTarget::Note(0x5A));
    }

    #[test]
    fn test_function_buttons_become_cc() {
        assert_eq!(map(0x5B), PadTarget::Control(0x68));
        assert_eq!(map(0x5C), PadTarget::Control(0x69));
        assert_eq!(map(0x63), PadTarget::Control(0x70));
    }

    proptest! {
        #[test]
        fn test_mapping_is_total_and_deterministic(pad in 0u8..=127) {
            match map(pad) {
                PadTarget::Note(note) => {
                    prop_assert!(pad < 0x5B);
                    prop_assert_eq!(note, pad);
                }
                PadTarget::Control(cc) => {
                    prop_assert!(pad >= 0x5B);
                    prop_assert_eq!(cc, pad - 0x5B + 0x68);
                }
            }
        }
    }
}
