/*!
Port discovery and pairing.

MIDI exposes inputs and outputs as two independent port lists, so nothing tells you which output
belongs to which input. The functions in here pair them up by name. The transport usually appends
an instance number to every port name ("Launchpad MK2 1", "Launchpad MK2 2"), so all matching is
done on the name with that suffix stripped, see [`normalize_name`].

```no_run
use launchpad_surface::port::{pair_by_pattern, PortPattern};

let inputs = ["Launchpad MK2 1", "Launchpad Pro 2"];
let outputs = ["Launchpad Pro 1", "Launchpad MK2 2"];

let pair = pair_by_pattern(&inputs[..], &outputs[..], &PortPattern::from("Launchpad"))?;
assert_eq!(pair.name(), "Launchpad MK2");
assert_eq!(pair.output().index(), 1);
# Ok::<(), launchpad_surface::LaunchpadError>(())
```
*/

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::LaunchpadError;

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum Direction {
    Input,
    Output,
}

/// Strip the transport-assigned instance number from a raw port name.
///
/// Exactly one trailing run of whitespace followed by digits is removed. Names without such a
/// suffix, or names that consist of nothing but the suffix, are returned unchanged.
///
/// ```
/// # use launchpad_surface::port::normalize_name;
/// assert_eq!(normalize_name("Launchpad MK2 12"), "Launchpad MK2");
/// assert_eq!(normalize_name("Launchpad MK2"), "Launchpad MK2");
/// ```
pub fn normalize_name(raw: &str) -> &str {
    let without_digits = raw.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() == raw.len() {
        return raw;
    }

    let base = without_digits.trim_end();
    if base.len() == without_digits.len() || base.is_empty() {
        // digits glued to the name ("MK2"), or nothing left
        return raw;
    }

    base
}

/// A single MIDI input or output endpoint as reported by the transport
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct PortInfo {
    index: usize,
    raw_name: String,
}

impl PortInfo {
    pub fn new(index: usize, raw_name: impl Into<String>) -> Self {
        Self {
            index,
            raw_name: raw_name.into(),
        }
    }

    /// The ordinal of this port in its transport's port list
    pub fn index(&self) -> usize {
        self.index
    }

    /// The name exactly as the transport reported it
    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    /// The name with the instance suffix stripped
    pub fn name(&self) -> &str {
        normalize_name(&self.raw_name)
    }
}

/// What a port name is compared against
#[derive(Debug, Clone)]
pub enum PortPattern {
    /// The normalized name contains this string
    Contains(String),
    /// The normalized name is exactly this string
    Exact(String),
    /// The normalized name matches this regular expression
    Regex(Regex),
}

impl PortPattern {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Contains(needle) => name.contains(needle.as_str()),
            Self::Exact(expected) => name == expected,
            Self::Regex(regex) => regex.is_match(name),
        }
    }
}

impl From<&str> for PortPattern {
    fn from(needle: &str) -> Self {
        Self::Contains(needle.to_string())
    }
}

impl From<String> for PortPattern {
    fn from(needle: String) -> Self {
        Self::Contains(needle)
    }
}

impl From<Regex> for PortPattern {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}

impl fmt::Display for PortPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(needle) => f.write_str(needle),
            Self::Exact(expected) => f.write_str(expected),
            Self::Regex(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

/// An enumerable list of ports, e.g. a midir `MidiInput` or simply a list of names
pub trait PortSource {
    fn port_count(&self) -> usize;

    /// The unprocessed name of the port at `index`
    fn raw_port_name(&self, index: usize) -> Result<String, LaunchpadError>;

    /// Snapshot of all ports whose name could be read. Unreadable ports are skipped.
    fn ports(&self) -> Vec<PortInfo> {
        let mut ports = Vec::with_capacity(self.port_count());
        for index in 0..self.port_count() {
            match self.raw_port_name(index) {
                Ok(name) => ports.push(PortInfo::new(index, name)),
                Err(e) => log::warn!("Skipping port {}: {}", index, e),
            }
        }
        ports
    }
}

impl<S: AsRef<str>> PortSource for [S] {
    fn port_count(&self) -> usize {
        self.len()
    }

    fn raw_port_name(&self, index: usize) -> Result<String, LaunchpadError> {
        self.get(index)
            .map(|name| name.as_ref().to_string())
            .ok_or_else(|| out_of_range(index, self.len()))
    }
}

impl<S: AsRef<str>> PortSource for Vec<S> {
    fn port_count(&self) -> usize {
        self.as_slice().port_count()
    }

    fn raw_port_name(&self, index: usize) -> Result<String, LaunchpadError> {
        self.as_slice().raw_port_name(index)
    }
}

fn out_of_range(index: usize, count: usize) -> LaunchpadError {
    LaunchpadError::InvalidPortSpec(format!(
        "port index {} is out of range ({} ports available)",
        index, count
    ))
}

/// Find the first port whose normalized name matches `pattern`.
pub fn find_first_match<P>(ports: &P, pattern: &PortPattern) -> Result<PortInfo, LaunchpadError>
where
    P: PortSource + ?Sized,
{
    ports
        .ports()
        .into_iter()
        .find(|port| pattern.matches(port.name()))
        .ok_or_else(|| LaunchpadError::NotFound {
            pattern: pattern.to_string(),
        })
}

/// Pair the first input matching `pattern` with the first output of the same normalized name.
///
/// The output is looked up by the input's name, not by `pattern`: the pattern may be as loose as
/// "any Launchpad", but two units of the same model must never get cross-wired.
pub fn pair_by_pattern<I, O>(
    inputs: &I,
    outputs: &O,
    pattern: &PortPattern,
) -> Result<PortPair, LaunchpadError>
where
    I: PortSource + ?Sized,
    O: PortSource + ?Sized,
{
    let input = find_first_match(inputs, pattern)?;
    let output = find_first_match(outputs, &PortPattern::Exact(input.name().to_string()))?;

    log::info!(
        "Paired input {:?} (#{}) with output {:?} (#{})",
        input.raw_name(),
        input.index(),
        output.raw_name(),
        output.index()
    );

    PortPair::new(input, output)
}

/// Returns the device name shared by both ports, or `NameMismatch` if they disagree.
pub fn identify_device(input: &PortInfo, output: &PortInfo) -> Result<String, LaunchpadError> {
    if input.name() == output.name() {
        Ok(input.name().to_string())
    } else {
        Err(LaunchpadError::NameMismatch {
            input: input.name().to_string(),
            output: output.name().to_string(),
        })
    }
}

/// An input and an output port that belong to the same physical device
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct PortPair {
    input: PortInfo,
    output: PortInfo,
}

impl PortPair {
    /// Fails with `NameMismatch` if the two ports don't share a normalized name.
    pub fn new(input: PortInfo, output: PortInfo) -> Result<Self, LaunchpadError> {
        identify_device(&input, &output)?;
        Ok(Self { input, output })
    }

    pub fn input(&self) -> &PortInfo {
        &self.input
    }

    pub fn output(&self) -> &PortInfo {
        &self.output
    }

    /// The normalized name both ports share
    pub fn name(&self) -> &str {
        self.input.name()
    }

    pub fn identify(&self) -> Result<String, LaunchpadError> {
        identify_device(&self.input, &self.output)
    }
}

/// A user-supplied description of which ports to use.
///
/// Parsed from strings like `"3"` (same index on both sides), `"1:2"` (input index, output index)
/// or anything else, which is taken as a name pattern.
#[derive(Debug, Clone)]
pub enum PortSpec {
    Shared(usize),
    Pair { input: usize, output: usize },
    Pattern(PortPattern),
}

impl PortSpec {
    pub fn resolve<I, O>(&self, inputs: &I, outputs: &O) -> Result<PortPair, LaunchpadError>
    where
        I: PortSource + ?Sized,
        O: PortSource + ?Sized,
    {
        match self {
            Self::Shared(index) => PortPair::new(port_at(inputs, *index)?, port_at(outputs, *index)?),
            Self::Pair { input, output } => {
                PortPair::new(port_at(inputs, *input)?, port_at(outputs, *output)?)
            }
            Self::Pattern(pattern) => pair_by_pattern(inputs, outputs, pattern),
        }
    }
}

fn port_at<P: PortSource + ?Sized>(ports: &P, index: usize) -> Result<PortInfo, LaunchpadError> {
    if index >= ports.port_count() {
        return Err(out_of_range(index, ports.port_count()));
    }
    Ok(PortInfo::new(index, ports.raw_port_name(index)?))
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

impl FromStr for PortSpec {
    type Err = LaunchpadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || LaunchpadError::InvalidPortSpec(format!("{:?}", s));

        if s.is_empty() {
            return Err(invalid());
        }

        if is_numeric(s) {
            return s.parse().map(Self::Shared).map_err(|_| invalid());
        }

        if let Some(colon) = s.find(':') {
            let (input, output) = (s[..colon].trim(), s[colon + 1..].trim());
            if is_numeric(input) || is_numeric(output) {
                return match (input.parse(), output.parse()) {
                    (Ok(input), Ok(output)) => Ok(Self::Pair { input, output }),
                    _ => Err(invalid()),
                };
            }
        }

        Ok(Self::Pattern(PortPattern::from(s)))
    }
}
