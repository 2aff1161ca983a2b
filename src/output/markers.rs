/// Prefix the runtime module writes in front of a computed value.
pub const RESULT_MARKER: &str = "RESULT:";
/// Prefix of the line the module writes during its no-argument self-check.
pub const STARTUP_CHECK_MARKER: &str = "Startup Check:";

/// Substrings that classify a line as UI-relevant.
///
/// Matching is case-sensitive substring search. The two built-in markers are
/// always present; configuration can add more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    markers: Vec<String>,
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self {
            markers: vec![RESULT_MARKER.to_string(), STARTUP_CHECK_MARKER.to_string()],
        }
    }
}

impl MarkerSet {
    /// Built-in markers plus `extra`, skipping empty strings and duplicates.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for marker in extra {
            let marker = marker.into();
            if !marker.is_empty() && !set.markers.contains(&marker) {
                set.markers.push(marker);
            }
        }
        set
    }

    /// First marker contained in `line`, if any.
    pub fn classify(&self, line: &str) -> Option<&str> {
        self.markers
            .iter()
            .find(|marker| line.contains(marker.as_str()))
            .map(String::as_str)
    }

    pub fn matches(&self, line: &str) -> bool {
        self.classify(line).is_some()
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}
