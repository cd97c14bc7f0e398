//! Match resolution - auto-select or interactive disambiguation

use crate::catalog::Candidate;

/// Candidates shown per page during disambiguation.
pub const PAGE_SIZE: usize = 5;

/// Outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Matched(Candidate),
    NoMatch,
    Skipped,
}

/// Terminal seam for the disambiguation dialogue.
///
/// The CLI backs this with stdin/stdout; tests feed scripted answers.
pub trait Console {
    fn print(&mut self, line: &str);
    /// Next operator input line, `None` once input is exhausted.
    fn read_line(&mut self) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Answer {
    Pick(usize),
    Skip,
    More,
}

fn parse_answer(input: &str) -> Option<Answer> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("s") || input.eq_ignore_ascii_case("skip") {
        return Some(Answer::Skip);
    }
    if input.eq_ignore_ascii_case("m") || input.eq_ignore_ascii_case("more") {
        return Some(Answer::More);
    }
    input.parse::<usize>().ok().map(Answer::Pick)
}

/// Resolve the candidate list produced for `query`.
///
/// A single candidate is auto-selected without operator input. Multiple
/// candidates run the paginated choice dialogue: an in-range 1-based index
/// selects, `s`/`skip` skips, `m`/`more` advances a page when one exists,
/// and anything else re-prompts. Exhausted input counts as a skip.
pub fn resolve(query: &str, mut candidates: Vec<Candidate>, console: &mut dyn Console) -> Resolution {
    match candidates.len() {
        0 => return Resolution::NoMatch,
        1 => return Resolution::Matched(candidates.remove(0)),
        _ => {}
    }

    console.print(&format!("\nMultiple matches found for '{query}':"));
    let page_count = candidates.len().div_ceil(PAGE_SIZE);
    let mut page = 0;
    show_page(&candidates, page, console);

    loop {
        console.print("\nChoose a number, 'm' for more, or 's' to skip:");
        let Some(input) = console.read_line() else {
            return Resolution::Skipped;
        };
        match parse_answer(&input) {
            Some(Answer::Skip) => return Resolution::Skipped,
            Some(Answer::More) => {
                if page + 1 < page_count {
                    page += 1;
                    show_page(&candidates, page, console);
                } else {
                    console.print("No more results.");
                }
            }
            Some(Answer::Pick(index)) if (1..=candidates.len()).contains(&index) => {
                return Resolution::Matched(candidates.swap_remove(index - 1));
            }
            _ => console.print("Invalid choice. Enter a listed number, 'm', or 's'."),
        }
    }
}

/// Print one page of candidates, numbered continuously across pages.
fn show_page(candidates: &[Candidate], page: usize, console: &mut dyn Console) {
    let start = page * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(candidates.len());
    for (offset, candidate) in candidates[start..end].iter().enumerate() {
        let marker = if candidate.remake {
            " (Remake/Remaster)"
        } else {
            ""
        };
        console.print(&format!(
            "{}. {} ({}){}",
            start + offset + 1,
            candidate.name,
            candidate.year_label(),
            marker
        ));
    }
    if end < candidates.len() {
        console.print(&format!("    ... {} more ('m' to show)", candidates.len() - end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted {
        inputs: VecDeque<String>,
        printed: Vec<String>,
    }

    impl Scripted {
        fn new(inputs: &[&str]) -> Self {
            Self {
                inputs: inputs.iter().map(|s| s.to_string()).collect(),
                printed: Vec::new(),
            }
        }
    }

    impl Console for Scripted {
        fn print(&mut self, line: &str) {
            self.printed.push(line.to_string());
        }

        fn read_line(&mut self) -> Option<String> {
            self.inputs.pop_front()
        }
    }

    fn candidate(name: &str, year: Option<i32>) -> Candidate {
        Candidate {
            name: name.to_string(),
            release_year: year,
            remake: false,
        }
    }

    fn many(count: usize) -> Vec<Candidate> {
        (1..=count)
            .map(|i| candidate(&format!("Game {i}"), Some(2000 + i as i32)))
            .collect()
    }

    #[test]
    fn test_zero_candidates_is_no_match() {
        let mut console = Scripted::new(&[]);
        assert_eq!(resolve("x", Vec::new(), &mut console), Resolution::NoMatch);
        assert!(console.printed.is_empty());
    }

    #[test]
    fn test_single_candidate_auto_selects_without_prompt() {
        let mut console = Scripted::new(&[]);
        let result = resolve("portal", vec![candidate("Portal 2", Some(2011))], &mut console);
        assert_eq!(result, Resolution::Matched(candidate("Portal 2", Some(2011))));
        assert!(console.printed.is_empty());
    }

    #[test]
    fn test_pick_by_index() {
        let mut console = Scripted::new(&["2"]);
        let result = resolve("doom", many(3), &mut console);
        assert_eq!(result, Resolution::Matched(candidate("Game 2", Some(2002))));
    }

    #[test]
    fn test_skip_word_and_letter() {
        for input in ["s", "skip", "SKIP"] {
            let mut console = Scripted::new(&[input]);
            assert_eq!(resolve("doom", many(3), &mut console), Resolution::Skipped);
        }
    }

    #[test]
    fn test_invalid_then_valid_input_reprompts() {
        let mut console = Scripted::new(&["huh", "0", "99", "1"]);
        let result = resolve("doom", many(3), &mut console);
        assert_eq!(result, Resolution::Matched(candidate("Game 1", Some(2001))));
        let invalid_lines = console
            .printed
            .iter()
            .filter(|line| line.starts_with("Invalid choice"))
            .count();
        assert_eq!(invalid_lines, 3);
    }

    #[test]
    fn test_first_page_shows_five_entries() {
        let mut console = Scripted::new(&["s"]);
        resolve("doom", many(8), &mut console);
        assert!(console.printed.iter().any(|l| l.starts_with("5. Game 5")));
        assert!(!console.printed.iter().any(|l| l.starts_with("6. Game 6")));
    }

    #[test]
    fn test_more_advances_page_and_allows_later_pick() {
        let mut console = Scripted::new(&["m", "7"]);
        let result = resolve("doom", many(8), &mut console);
        assert_eq!(result, Resolution::Matched(candidate("Game 7", Some(2007))));
        assert!(console.printed.iter().any(|l| l.starts_with("6. Game 6")));
    }

    #[test]
    fn test_more_on_last_page_reprompts() {
        let mut console = Scripted::new(&["m", "m", "3"]);
        let result = resolve("doom", many(8), &mut console);
        assert_eq!(result, Resolution::Matched(candidate("Game 3", Some(2003))));
        assert!(console.printed.iter().any(|l| l == "No more results."));
    }

    #[test]
    fn test_pick_across_pages_without_more() {
        // Index 8 is valid even while page 1 is displayed.
        let mut console = Scripted::new(&["8"]);
        let result = resolve("doom", many(8), &mut console);
        assert_eq!(result, Resolution::Matched(candidate("Game 8", Some(2008))));
    }

    #[test]
    fn test_exhausted_input_skips() {
        let mut console = Scripted::new(&[]);
        assert_eq!(resolve("doom", many(3), &mut console), Resolution::Skipped);
    }

    #[test]
    fn test_remake_marker_is_displayed() {
        let mut remake = candidate("Resident Evil 2", Some(2019));
        remake.remake = true;
        let mut console = Scripted::new(&["s"]);
        resolve("re2", vec![remake, candidate("Resident Evil 2", Some(1998))], &mut console);
        assert!(
            console
                .printed
                .iter()
                .any(|l| l == "1. Resident Evil 2 (2019) (Remake/Remaster)")
        );
    }

    #[test]
    fn test_tba_annotation_for_undated_candidate() {
        let mut console = Scripted::new(&["s"]);
        resolve(
            "x",
            vec![candidate("Announced Game", None), candidate("Other", Some(2020))],
            &mut console,
        );
        assert!(console.printed.iter().any(|l| l == "1. Announced Game (TBA)"));
    }
}
