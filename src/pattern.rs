use crate::error::{VizError, VizResult};

const SEPARATORS: [char; 2] = ['_', '/'];

/// Destination of one segment of a benchmark name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Name,
    XAxis,
    YAxis,
    /// Empty token: the segment is consumed and dropped.
    Skip,
}

impl Part {
    /// Full and shorthand spellings; `s`/`subject` and `w`/`workload` are
    /// the older names of the two axes.
    fn parse(token: &str) -> Option<Self> {
        match token {
            "" => Some(Part::Skip),
            "n" | "name" => Some(Part::Name),
            "x" | "s" | "subject" => Some(Part::XAxis),
            "y" | "w" | "workload" => Some(Part::YAxis),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Part::Name => "name",
            Part::XAxis => "x",
            Part::YAxis => "y",
            Part::Skip => "",
        }
    }
}

/// A benchmark name split into record fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
    pub name: String,
    pub x_axis: String,
    pub y_axis: String,
}

/// How to cut a benchmark name into group name, x and y categories
///
/// A pattern is a list of parts joined by `_` or `/`, e.g. `n/x/y` or
/// `name_subject`. Each separator in the pattern is looked for once, in
/// order, in what is left of the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    parts: Vec<Part>,
    separators: Vec<char>,
}

/// The whole name is the x category.
impl Default for NamePattern {
    fn default() -> Self {
        Self {
            parts: vec![Part::XAxis],
            separators: Vec::new(),
        }
    }
}

fn invalid(message: impl Into<String>) -> VizError {
    VizError::InvalidPattern(message.into())
}

impl NamePattern {
    pub fn parse(pattern: &str) -> VizResult<Self> {
        if pattern.is_empty() {
            return Err(invalid("pattern cannot be empty"));
        }

        let mut parts = Vec::new();
        for token in pattern.split(SEPARATORS) {
            let part = Part::parse(token).ok_or_else(|| {
                invalid(format!(
                    "unknown part '{}'; only name (n), x (s) and y (w) are allowed",
                    token
                ))
            })?;
            if part != Part::Skip && parts.contains(&part) {
                return Err(invalid(format!("part '{}' appears twice", part.as_str())));
            }
            parts.push(part);
        }
        let separators = pattern.chars().filter(|c| SEPARATORS.contains(c)).collect();

        if !parts.iter().any(|p| matches!(p, Part::XAxis | Part::YAxis)) {
            return Err(invalid("pattern must contain x (s) or y (w)"));
        }

        Ok(Self { parts, separators })
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Split `name` by the pattern's separators, left to right
    ///
    /// A separator missing from the name is skipped. Empty segments are
    /// dropped, then segments are matched to parts by position; parts
    /// without a segment stay empty and extra text stays in the last segment.
    pub fn split(&self, name: &str) -> NameParts {
        let mut segments = Vec::with_capacity(self.parts.len());
        let mut rest = name;
        for &sep in &self.separators {
            if let Some((head, tail)) = rest.split_once(sep) {
                segments.push(head);
                rest = tail;
            }
        }
        segments.push(rest);
        segments.retain(|s| !s.is_empty());

        let mut out = NameParts::default();
        for (part, segment) in self.parts.iter().zip(segments) {
            let slot = match part {
                Part::Name => &mut out.name,
                Part::XAxis => &mut out.x_axis,
                Part::YAxis => &mut out.y_axis,
                Part::Skip => continue,
            };
            *slot = segment.to_string();
        }
        out
    }
}

/// Validate `pattern` and split `name` with it.
pub fn parse_name(name: &str, pattern: &str) -> VizResult<NameParts> {
    Ok(NamePattern::parse(pattern)?.split(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parts(name: &str, x: &str, y: &str) -> NameParts {
        NameParts {
            name: name.to_string(),
            x_axis: x.to_string(),
            y_axis: y.to_string(),
        }
    }

    fn split(name: &str, pattern: &str) -> NameParts {
        parse_name(name, pattern).unwrap()
    }

    #[test]
    fn test_full_and_shorthand_patterns() {
        assert_eq!(split("Rivet_GPlusStatic", "name_subject"), parts("Rivet", "GPlusStatic", ""));
        assert_eq!(
            split("Rivet/GPlusStatic/100k", "name/subject/workload"),
            parts("Rivet", "GPlusStatic", "100k")
        );
        assert_eq!(
            split("Group/Task/SubjectA", "n/x/y"),
            parts("Group", "Task", "SubjectA")
        );
        assert_eq!(
            split("MyLib_ComplexFunction_TestCase", "n_s_w"),
            parts("MyLib", "ComplexFunction", "TestCase")
        );
    }

    #[test]
    fn test_parts_in_any_order() {
        assert_eq!(
            split("Rivet/GPlusStatic/100k", "subject/name/workload"),
            parts("GPlusStatic", "Rivet", "100k")
        );
        assert_eq!(
            split("Rivet/GPlusStatic/100k", "workload/subject/name"),
            parts("100k", "GPlusStatic", "Rivet")
        );
    }

    #[test]
    fn test_remainder_stays_in_last_part() {
        assert_eq!(split("Rivet_GPlusStatic", "subject"), parts("", "Rivet_GPlusStatic", ""));
        assert_eq!(
            split("Rivet_GPlusStatic/100k", "subject/workload"),
            parts("", "Rivet_GPlusStatic", "100k")
        );
        assert_eq!(
            split("MyLib_ComplexFunction_TestCase", "name_subject"),
            parts("MyLib", "ComplexFunction_TestCase", "")
        );
        assert_eq!(
            split("Rivet_GPlusStatic/100k_extra", "name_subject/workload"),
            parts("Rivet", "GPlusStatic", "100k_extra")
        );
    }

    #[test]
    fn test_skipped_segments() {
        assert_eq!(
            split("Tasks/Name/Workload/Subject", "/name/workload/subject"),
            parts("Name", "Subject", "Workload")
        );
        assert_eq!(
            split("Tasks/Name/Workload/Subject", "/name//subject"),
            parts("Name", "Subject", "")
        );
    }

    #[test]
    fn test_short_names_leave_parts_empty() {
        assert_eq!(split("Rivet", "name_subject_workload"), parts("Rivet", "", ""));
        // A separator absent from the name is passed over.
        assert_eq!(split("Rivet/GPlus", "n_s/w"), parts("Rivet", "GPlus", ""));
        assert_eq!(split("", "n/x"), parts("", "", ""));
    }

    #[test]
    fn test_pattern_validation() {
        assert!(NamePattern::parse("name_subject").is_ok());
        assert!(NamePattern::parse("n_s/w").is_ok());
        assert!(NamePattern::parse("y").is_ok());

        let message = |p: &str| NamePattern::parse(p).unwrap_err().to_string();
        assert!(message("").contains("pattern cannot be empty"));
        assert!(message("name_invalid").contains("unknown part 'invalid'"));
        assert!(message("name").contains("must contain x (s) or y (w)"));
        assert!(message("n/x/s").contains("part 'x' appears twice"));
        assert!(matches!(
            NamePattern::parse("q"),
            Err(VizError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_parsed_layout() {
        let pattern = NamePattern::parse("/n_w").unwrap();
        assert_eq!(pattern.parts(), &[Part::Skip, Part::Name, Part::YAxis]);
        assert_eq!(pattern.separators, vec!['/', '_']);
        assert_eq!(NamePattern::default().split("Gin"), parts("", "Gin", ""));
    }

    proptest! {
        #[test]
        fn prop_segments_round_trip(
            n in "[A-Za-z0-9]{1,8}",
            x in "[A-Za-z0-9]{1,8}",
            y in "[A-Za-z0-9]{1,8}",
        ) {
            let pattern = NamePattern::parse("n/x_y").unwrap();
            let got = pattern.split(&format!("{}/{}_{}", n, x, y));
            prop_assert_eq!(got, parts(&n, &x, &y));
        }
    }
}
