//! Route table and the output state register
//!
//! The register owns the 16-bit output word. It is only ever changed by
//! XOR-ing a whole route group, so at any point the word equals the boot
//! pattern XOR the groups that have been toggled an odd number of times.

use heapless::Vec;

use crate::config::{InputConfig, MAX_INPUTS};
use crate::error::ConfigError;
use crate::types::{OutputState, RouteBitGroup};

// ===================================================================
// Route State Register
// ===================================================================

#[derive(Debug, Clone)]
pub struct RouteStateRegister {
    state: OutputState,
}

impl RouteStateRegister {
    pub const fn new(initial: OutputState) -> Self {
        Self { state: initial }
    }

    /// Flip the three bits of `group`; every other bit is untouched.
    pub fn toggle_group(&mut self, group: &RouteBitGroup) -> OutputState {
        self.state = self.state.toggled(group.mask());
        self.state
    }

    pub fn current(&self) -> OutputState {
        self.state
    }
}

// ===================================================================
// Route Table
// ===================================================================

/// A wired input and the route (if any) behind it.
#[derive(Debug, Clone, Copy)]
pub struct RouteEntry {
    pub name: &'static str,
    /// GPIO the button is wired to
    pub pin: u8,
    pub debounce_ms: u64,
    pub group: Option<RouteBitGroup>,
}

/// Validated input-to-group mapping, indexed by input position.
///
/// No two groups share a bit, so toggling one route can never disturb
/// another.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry, MAX_INPUTS>,
}

impl RouteTable {
    pub fn new(inputs: &[InputConfig]) -> Result<Self, ConfigError> {
        if inputs.len() > MAX_INPUTS {
            return Err(ConfigError::TooManyInputs { count: inputs.len() });
        }

        let mut entries: Vec<RouteEntry, MAX_INPUTS> = Vec::new();
        for (index, input) in inputs.iter().enumerate() {
            let group = match input.group {
                Some(bits) => {
                    let group = RouteBitGroup::from_array(bits)?;
                    for (earlier, entry) in entries.iter().enumerate() {
                        if let Some(bit) = entry.group.and_then(|other| other.overlap(&group)) {
                            return Err(ConfigError::OverlappingGroups {
                                first: earlier,
                                second: index,
                                bit,
                            });
                        }
                    }
                    Some(group)
                }
                None => None,
            };
            entries
                .push(RouteEntry {
                    name: input.name,
                    pin: input.pin,
                    debounce_ms: input.debounce_ms,
                    group,
                })
                .map_err(|_| ConfigError::TooManyInputs { count: inputs.len() })?;
        }

        Ok(Self { entries })
    }

    pub fn get(&self, input: usize) -> Option<&RouteEntry> {
        self.entries.get(input)
    }

    pub fn group_for(&self, input: usize) -> Option<&RouteBitGroup> {
        self.entries.get(input).and_then(|entry| entry.group.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// Number of wired inputs, spares included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of inputs that drive a route
    pub fn route_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.group.is_some()).count()
    }

    /// Union of every route's bits
    pub fn used_mask(&self) -> u16 {
        self.entries
            .iter()
            .filter_map(|entry| entry.group)
            .fold(0, |mask, group| mask | group.mask())
    }

    /// Check that exactly one debounced input is wired per table entry.
    /// An entry without an input could never be pressed.
    pub fn check_wired(&self, wired: usize) -> Result<(), ConfigError> {
        if wired == self.entries.len() {
            Ok(())
        } else {
            Err(ConfigError::InputCountMismatch {
                configured: self.entries.len(),
                wired,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_OUTPUT_PATTERN, INPUTS};
    use proptest::prelude::*;

    fn shipped() -> RouteTable {
        RouteTable::new(&INPUTS).unwrap()
    }

    #[test]
    fn toggle_flips_exactly_the_group_for_every_state() {
        let table = shipped();
        for group in table.iter().filter_map(|entry| entry.group) {
            for bits in 0..=u16::MAX {
                let mut register = RouteStateRegister::new(OutputState::from_bits(bits));
                let after = register.toggle_group(&group).bits();
                let changed = after ^ bits;
                assert_eq!(changed, group.mask());
                assert_eq!(changed.count_ones(), 3);
            }
        }
    }

    #[test]
    fn toggle_twice_restores_state() {
        let group = RouteBitGroup::new(9, 10, 11).unwrap();
        let mut register = RouteStateRegister::new(OutputState::from_bits(DEFAULT_OUTPUT_PATTERN));
        register.toggle_group(&group);
        assert_ne!(register.current().bits(), DEFAULT_OUTPUT_PATTERN);
        assert_eq!(register.toggle_group(&group).bits(), DEFAULT_OUTPUT_PATTERN);
    }

    #[test]
    fn route_a_toggle_from_default() {
        let table = shipped();
        let mut register = RouteStateRegister::new(OutputState::from_bits(DEFAULT_OUTPUT_PATTERN));
        let group = table.group_for(0).unwrap();
        assert_eq!(register.toggle_group(group).bits(), 0b0100_1001_0010_0011);
    }

    #[test]
    fn current_does_not_mutate() {
        let register = RouteStateRegister::new(OutputState::from_bits(0x1234));
        assert_eq!(register.current(), register.current());
        assert_eq!(register.current().bits(), 0x1234);
    }

    #[test]
    fn shipped_groups_are_disjoint() {
        let table = shipped();
        let groups: Vec<RouteBitGroup, MAX_INPUTS> = table.iter().filter_map(|e| e.group).collect();
        for (i, a) in groups.iter().enumerate() {
            for b in groups.iter().skip(i + 1) {
                assert_eq!(a.overlap(b), None);
            }
        }
        assert_eq!(table.used_mask(), 0x7FFF);
    }

    #[test]
    fn spare_inputs_have_no_group() {
        let table = shipped();
        for input in 5..8 {
            assert!(table.group_for(input).is_none());
            assert!(table.get(input).is_some());
        }
        assert!(table.get(8).is_none());
    }

    #[test]
    fn overlapping_groups_are_rejected() {
        let inputs = [
            InputConfig::route("A", 2, 5, [0, 1, 2]),
            InputConfig::spare("S", 3, 5),
            InputConfig::route("B", 4, 5, [2, 3, 4]),
        ];
        assert_eq!(
            RouteTable::new(&inputs).unwrap_err(),
            ConfigError::OverlappingGroups { first: 0, second: 2, bit: 2 }
        );
    }

    #[test]
    fn out_of_range_bit_is_rejected() {
        let inputs = [InputConfig::route("A", 2, 5, [13, 14, 15]), InputConfig::route("B", 3, 5, [7, 8, 16])];
        assert_eq!(RouteTable::new(&inputs).unwrap_err(), ConfigError::BitOutOfRange { bit: 16 });
    }

    #[test]
    fn too_many_inputs_are_rejected() {
        let inputs = [InputConfig::spare("S", 2, 5); MAX_INPUTS + 1];
        assert_eq!(
            RouteTable::new(&inputs).unwrap_err(),
            ConfigError::TooManyInputs { count: MAX_INPUTS + 1 }
        );
    }

    #[test]
    fn entries_carry_their_own_wiring() {
        let inputs = [
            InputConfig::route("X", 20, 12, [0, 1, 2]),
            InputConfig::spare("Y", 21, 3),
        ];
        let table = RouteTable::new(&inputs).unwrap();
        let x = table.get(0).unwrap();
        assert_eq!((x.name, x.pin, x.debounce_ms), ("X", 20, 12));
        let y = table.get(1).unwrap();
        assert_eq!((y.name, y.pin, y.debounce_ms), ("Y", 21, 3));
        assert!(y.group.is_none());
    }

    #[test]
    fn shipped_entries_match_config() {
        let table = shipped();
        for (entry, input) in table.iter().zip(INPUTS.iter()) {
            assert_eq!((entry.pin, entry.debounce_ms), (input.pin, input.debounce_ms));
        }
    }

    #[test]
    fn fewer_wired_inputs_than_entries_is_rejected() {
        let inputs = [
            InputConfig::route("A", 2, 5, [0, 1, 2]),
            InputConfig::route("B", 3, 5, [3, 4, 5]),
            InputConfig::route("C", 4, 5, [6, 7, 8]),
            InputConfig::route("D", 5, 5, [9, 10, 11]),
            InputConfig::route("X", 6, 5, [12, 13, 14]),
        ];
        let table = RouteTable::new(&inputs).unwrap();
        assert_eq!(
            table.check_wired(4),
            Err(ConfigError::InputCountMismatch { configured: 5, wired: 4 })
        );
        assert_eq!(
            table.check_wired(6),
            Err(ConfigError::InputCountMismatch { configured: 5, wired: 6 })
        );
        assert_eq!(table.check_wired(5), Ok(()));
    }

    #[test]
    fn shipped_table_matches_its_wiring() {
        assert_eq!(shipped().check_wired(INPUTS.len()), Ok(()));
    }

    proptest! {
        #[test]
        fn accepted_tables_never_share_bits(
            raw in proptest::collection::vec(proptest::array::uniform3(0u8..20), 0..8)
        ) {
            let inputs: std::vec::Vec<InputConfig> = raw
                .iter()
                .map(|bits| InputConfig::route("R", 0, 5, *bits))
                .collect();
            if let Ok(table) = RouteTable::new(&inputs) {
                let mut seen = 0u16;
                for group in table.iter().filter_map(|e| e.group) {
                    prop_assert_eq!(seen & group.mask(), 0);
                    prop_assert_eq!(group.mask().count_ones(), 3);
                    seen |= group.mask();
                }
            }
        }

        #[test]
        fn state_is_initial_xor_odd_toggled_groups(
            initial in any::<u16>(),
            presses in proptest::collection::vec(0usize..5, 0..64)
        ) {
            let table = shipped();
            let mut register = RouteStateRegister::new(OutputState::from_bits(initial));
            let mut counts = [0u32; 5];
            for &input in &presses {
                register.toggle_group(table.group_for(input).unwrap());
                counts[input] += 1;
            }
            let expected = counts
                .iter()
                .enumerate()
                .filter(|(_, n)| **n % 2 == 1)
                .fold(initial, |bits, (input, _)| bits ^ table.group_for(input).unwrap().mask());
            prop_assert_eq!(register.current().bits(), expected);
        }
    }
}
