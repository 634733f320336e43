use serde::{Deserialize, Serialize};

/// How a brochure section is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Text,
    Checklist,
    Warning,
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_kind_serializes_snake_case() {
        let json = serde_json::to_string(&SectionKind::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        let parsed: SectionKind = serde_json::from_str("\"checklist\"").unwrap();
        assert_eq!(parsed, SectionKind::Checklist);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(serde_json::from_str::<SectionKind>("\"banner\"").is_err());
        assert!(serde_json::from_str::<SectionKind>("\"\"").is_err());
    }
}
