use regex::{Regex, RegexBuilder};

use crate::LaunchpadError;

/// A firmware-side button mapping mode, e.g. "Session" or "User 1".
///
/// `pattern` is a case-insensitive regular expression that matches the names the device and the
/// host software use for this layout. `channel` is the 1-based MIDI channel the layout talks on.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct Layout {
    pub name: &'static str,
    pub pattern: &'static str,
    pub channel: u8,
}

/// The ordered layouts of one device type, with their patterns compiled.
///
/// Layout indices are positions in this table and are what the note formulas are keyed on.
#[derive(Debug, Clone)]
pub struct LayoutTable {
    layouts: Vec<(Layout, Regex)>,
}

impl LayoutTable {
    pub fn new(layouts: &[Layout]) -> Result<Self, LaunchpadError> {
        let layouts = layouts
            .iter()
            .map(|layout| -> Result<_, LaunchpadError> {
                let regex = RegexBuilder::new(layout.pattern)
                    .case_insensitive(true)
                    .build()?;
                Ok((*layout, regex))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { layouts })
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Layout> {
        self.layouts.get(index).map(|(layout, _)| layout)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layout> + '_ {
        self.layouts.iter().map(|(layout, _)| layout)
    }

    /// Fails with `LayoutOutOfRange` if there's no layout at `index`
    pub fn check_index(&self, index: usize) -> Result<(), LaunchpadError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(LaunchpadError::LayoutOutOfRange {
                index,
                count: self.len(),
            })
        }
    }

    /// The MIDI channel of the layout at `index`
    pub fn channel(&self, index: usize) -> Result<u8, LaunchpadError> {
        self.check_index(index)?;
        Ok(self.layouts[index].0.channel)
    }

    /// Index of the first layout whose pattern matches `name`.
    ///
    /// ```
    /// # use launchpad_surface::{layout::LayoutTable, DeviceSpec, mk2};
    /// let table = LayoutTable::new(mk2::Spec::LAYOUTS)?;
    /// assert_eq!(table.resolve("Drum Rack")?, 1);
    /// assert_eq!(table.channel(1)?, 6);
    /// # Ok::<(), launchpad_surface::LaunchpadError>(())
    /// ```
    pub fn resolve(&self, name: &str) -> Result<usize, LaunchpadError> {
        self.layouts
            .iter()
            .position(|(_, regex)| regex.is_match(name))
            .ok_or_else(|| LaunchpadError::LayoutNotFound(name.to_string()))
    }
}

impl std::ops::Index<usize> for LayoutTable {
    type Output = Layout;

    fn index(&self, index: usize) -> &Layout {
        &self.layouts[index].0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUTS: &[Layout] = &[
        Layout {
            name: "Session",
            pattern: "Session|Default",
            channel: 1,
        },
        Layout {
            name: "User 1",
            pattern: "User 1|Drum|Rack",
            channel: 6,
        },
        Layout {
            name: "User 2",
            pattern: "User 2",
            channel: 14,
        },
    ];

    #[test]
    fn test_resolve_is_case_insensitive() {
        let table = LayoutTable::new(LAYOUTS).unwrap();
        assert_eq!(table.resolve("session").unwrap(), 0);
        assert_eq!(table.resolve("DEFAULT").unwrap(), 0);
        assert_eq!(table.resolve("drum rack").unwrap(), 1);
        assert_eq!(table.resolve("User 2").unwrap(), 2);
    }

    #[test]
    fn test_resolve_unknown() {
        let table = LayoutTable::new(LAYOUTS).unwrap();
        match table.resolve("Mixer") {
            Err(LaunchpadError::LayoutNotFound(name)) => assert_eq!(name, "Mixer"),
            other => panic!("Expected LayoutNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_channel() {
        let table = LayoutTable::new(LAYOUTS).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.channel(2).unwrap(), 14);
        assert!(matches!(
            table.channel(3),
            Err(LaunchpadError::LayoutOutOfRange { index: 3, count: 3 })
        ));
    }

    #[test]
    fn test_bad_pattern() {
        let broken = [Layout {
            name: "Broken",
            pattern: "(unclosed",
            channel: 1,
        }];
        assert!(matches!(
            LayoutTable::new(&broken),
            Err(LaunchpadError::LayoutPattern(_))
        ));
    }
}
