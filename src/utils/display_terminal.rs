//! 터미널 출력 포맷팅 유틸리티
//!
//! `Container::initialize_all`의 진행 상황을 표 형태로 보여주는 [`WarmupReport`]를
//! 제공합니다. 렌더링은 문자열로 이루어지고 출력은 `print`에서만 일어납니다.
//!
//! ```text
//! ┌─ instance registry ─ warm-up ──────────────────
//! │ Greeter ............................... ok
//! │ Mailer ................................ FAILED
//! │     Missing link for 'app::Smtp'
//! └─ 1 created · 1 failed · 3 links
//! ```

use std::fmt::Write as _;

/// 이름 열 너비 (점 채움 포함)
const NAME_COLUMN: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Created,
    Failed(String),
}

/// 싱글톤 미리 생성 결과를 모아 출력하는 리포트
#[derive(Debug, Default)]
pub struct WarmupReport {
    rows: Vec<(String, Outcome)>,
}

impl WarmupReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&mut self, name: &str) {
        self.rows.push((name.to_string(), Outcome::Created));
    }

    pub fn failed(&mut self, name: &str, reason: impl Into<String>) {
        self.rows.push((name.to_string(), Outcome::Failed(reason.into())));
    }

    pub fn created_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|(_, outcome)| *outcome == Outcome::Created)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.rows.len() - self.created_count()
    }

    /// 리포트 전체를 문자열로 만듭니다. `links`는 요약 줄에 표시할 링크 수입니다.
    pub fn render(&self, links: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "┌─ instance registry ─ warm-up {}", "─".repeat(18));

        if self.rows.is_empty() {
            let _ = writeln!(out, "│ (no registered instances)");
        }

        for (name, outcome) in &self.rows {
            let dots = ".".repeat(NAME_COLUMN.saturating_sub(name.chars().count() + 1).max(3));
            match outcome {
                Outcome::Created => {
                    let _ = writeln!(out, "│ {} {} ok", name, dots);
                }
                Outcome::Failed(reason) => {
                    let _ = writeln!(out, "│ {} {} FAILED", name, dots);
                    for line in reason.lines() {
                        let _ = writeln!(out, "│     {}", line);
                    }
                }
            }
        }

        let _ = writeln!(
            out,
            "└─ {} created · {} failed · {} links",
            self.created_count(),
            self.failed_count(),
            links
        );
        out
    }

    pub fn print(&self, links: usize) {
        print!("{}", self.render(links));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_rows_and_summary() {
        let mut report = WarmupReport::new();
        report.created("Greeter");
        report.failed("Mailer", "Missing link for 'app::Smtp'");

        let rendered = report.render(3);
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[0].starts_with("┌─ instance registry"));
        assert!(lines[1].starts_with("│ Greeter ...") && lines[1].ends_with(" ok"));
        assert!(lines[2].starts_with("│ Mailer ...") && lines[2].ends_with(" FAILED"));
        assert_eq!(lines[3], "│     Missing link for 'app::Smtp'");
        assert_eq!(lines[4], "└─ 1 created · 1 failed · 3 links");
    }

    #[test]
    fn test_long_names_keep_minimum_padding() {
        let mut report = WarmupReport::new();
        let name = "x".repeat(NAME_COLUMN + 5);
        report.created(&name);

        assert!(report.render(0).contains(&format!("{} ... ok", name)));
    }

    #[test]
    fn test_empty_report() {
        let report = WarmupReport::new();
        let rendered = report.render(0);

        assert!(rendered.contains("(no registered instances)"));
        assert!(rendered.ends_with("└─ 0 created · 0 failed · 0 links\n"));
        assert_eq!(report.failed_count(), 0);
    }
}
