//! Hour/minute/second sub-field handling for the break times.

/// One of the three sub-fields of a break time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeComponent {
    Hour,
    Minute,
    Second,
}

impl TimeComponent {
    /// Largest value the component accepts.
    pub fn max(self) -> u32 {
        match self {
            TimeComponent::Hour => 23,
            TimeComponent::Minute | TimeComponent::Second => 59,
        }
    }

    /// Position inside the colon-joined string.
    pub fn index(self) -> usize {
        match self {
            TimeComponent::Hour => 0,
            TimeComponent::Minute => 1,
            TimeComponent::Second => 2,
        }
    }

    /// Short label shown next to the input cell.
    pub fn label(self) -> &'static str {
        match self {
            TimeComponent::Hour => "HH",
            TimeComponent::Minute => "MM",
            TimeComponent::Second => "SS",
        }
    }
}

/// Strip non-digits, clamp to `[0, max]` and zero-pad to two digits.
///
/// An input without any digit means the field has not been filled yet and
/// yields an empty string.
pub fn normalize_component(raw: &str, max: u32) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }
    // Long digit runs overflow u32; they are above any max anyway.
    let value = digits.parse::<u32>().unwrap_or(u32::MAX);
    format!("{:02}", value.min(max))
}

/// Join the three components with `:`.
///
/// An absent component becomes `"00"`; an empty one stays empty so that
/// validation can later reject the incomplete time.
pub fn compose_time(hour: Option<&str>, minute: Option<&str>, second: Option<&str>) -> String {
    format!(
        "{}:{}:{}",
        hour.unwrap_or("00"),
        minute.unwrap_or("00"),
        second.unwrap_or("00")
    )
}

/// Read-only view of a stored time string split into its components.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimeValue<'a> {
    parts: Vec<&'a str>,
}

impl<'a> TimeValue<'a> {
    pub fn parse(stored: &'a str) -> Self {
        Self {
            parts: stored.split(':').collect(),
        }
    }

    /// Component as entered, `None` when the stored string has no such part.
    pub fn get(&self, component: TimeComponent) -> Option<&'a str> {
        self.parts.get(component.index()).copied()
    }

    /// Component for display; absent parts show as empty.
    pub fn component(&self, component: TimeComponent) -> &'a str {
        self.get(component).unwrap_or("")
    }

    /// Replace one component of `stored` with the normalized `raw` input and
    /// return the recomposed time string.
    pub fn set(stored: &str, component: TimeComponent, raw: &str) -> String {
        let current = TimeValue::parse(stored);
        let value = normalize_component(raw, component.max());
        let pick = |c: TimeComponent| {
            if c == component {
                Some(value.as_str())
            } else {
                current.get(c)
            }
        };
        compose_time(
            pick(TimeComponent::Hour),
            pick(TimeComponent::Minute),
            pick(TimeComponent::Second),
        )
    }
}
