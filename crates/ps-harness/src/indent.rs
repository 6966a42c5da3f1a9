const TAB_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndentOutcome {
    Width(usize),
    Mixed,
    Unknown,
}

#[derive(Debug, Default)]
pub(crate) struct IndentScanner {
    width_gcd: usize,
    saw_spaces: bool,
    saw_tabs: bool,
    mixed: bool,
}

impl IndentScanner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn scan_line(&mut self, line: &str) {
        let trimmed = line.trim_start_matches(|ch| ch == ' ' || ch == '\t');
        if trimmed.trim().is_empty() {
            // Blank lines carry no indentation signal.
            return;
        }
        let indent = &line[..line.len() - trimmed.len()];
        let spaces = indent.chars().filter(|ch| *ch == ' ').count();
        let tabs = indent.chars().filter(|ch| *ch == '\t').count();
        if spaces > 0 && tabs > 0 {
            self.mixed = true;
        } else if tabs > 0 {
            self.saw_tabs = true;
        } else if spaces > 0 {
            self.saw_spaces = true;
            self.width_gcd = gcd(self.width_gcd, spaces);
        }
    }

    pub(crate) fn finish(&self) -> IndentOutcome {
        if self.mixed || (self.saw_tabs && self.saw_spaces) {
            return IndentOutcome::Mixed;
        }
        if self.saw_tabs {
            return IndentOutcome::Width(TAB_WIDTH);
        }
        if self.saw_spaces {
            return IndentOutcome::Width(self.width_gcd);
        }
        IndentOutcome::Unknown
    }
}

fn gcd(a: usize, b: usize) -> usize {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let next = a % b;
        a = b;
        b = next;
    }
    a
}

#[cfg(test)]
mod indent_tests {
    use super::*;

    fn outcome_of(lines: &[&str]) -> IndentOutcome {
        let mut scanner = IndentScanner::new();
        for line in lines {
            scanner.scan_line(line);
        }
        scanner.finish()
    }

    #[test]
    fn detects_consistent_space_width() {
        assert_eq!(
            outcome_of(&["if x {", "    y = 1;", "}"]),
            IndentOutcome::Width(4)
        );
        assert_eq!(outcome_of(&["  a", "  b"]), IndentOutcome::Width(2));
    }

    #[test]
    fn nested_depths_reduce_to_the_common_unit() {
        assert_eq!(
            outcome_of(&["    a", "        b", "            c"]),
            IndentOutcome::Width(4)
        );
        assert_eq!(outcome_of(&["      a", "    b"]), IndentOutcome::Width(2));
    }

    #[test]
    fn tab_only_indentation_uses_the_classic_tab_width() {
        assert_eq!(outcome_of(&["\ta", "\t\tb"]), IndentOutcome::Width(8));
    }

    #[test]
    fn tabs_and_spaces_on_one_line_are_mixed() {
        assert_eq!(outcome_of(&[" \ta"]), IndentOutcome::Mixed);
        assert_eq!(outcome_of(&["\t  a"]), IndentOutcome::Mixed);
    }

    #[test]
    fn tabs_and_spaces_across_lines_are_mixed() {
        assert_eq!(outcome_of(&["\ta", "    b"]), IndentOutcome::Mixed);
    }

    #[test]
    fn unindented_bodies_are_unknown() {
        assert_eq!(outcome_of(&["a", "b"]), IndentOutcome::Unknown);
        assert_eq!(outcome_of(&[]), IndentOutcome::Unknown);
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(
            outcome_of(&["a", "   ", "\t", "    b", ""]),
            IndentOutcome::Width(4)
        );
    }
}
