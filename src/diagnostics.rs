use std::fmt;

/// Where a non-fatal issue was found.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "key")]
pub enum Origin {
    Scene(String),
    Production,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scene(key) => write!(f, "scene {key}"),
            Self::Production => f.write_str("produce"),
        }
    }
}

/// A configuration issue that was corrected or skipped.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    pub origin: Origin,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.origin, self.message)
    }
}

/// Append-only collector. Every pushed diagnostic is also logged at `warn`.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, origin: Origin, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(origin = %origin, "{message}");
        self.items.push(Diagnostic { origin, message });
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        for d in other {
            self.push(d.origin, d.message);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.items.iter().map(|d| d.message.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_order_and_origin() {
        let mut diags = Diagnostics::new();
        diags.push(Origin::Scene("1".to_string()), "first");
        diags.push(Origin::Production, "second");

        assert_eq!(diags.len(), 2);
        assert_eq!(diags.messages(), vec!["first", "second"]);
        let all = diags.into_vec();
        assert_eq!(all[0].origin, Origin::Scene("1".to_string()));
        assert_eq!(all[1].to_string(), "produce: second");
    }
}
