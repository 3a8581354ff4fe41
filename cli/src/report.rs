use shared::sync::{PlannedChange, SeasonReport, SyncCounters, SyncReport};
use shared::Section;

fn mode(dry_run: bool) -> &'static str {
    if dry_run {
        "dry-run"
    } else {
        "apply"
    }
}

fn counter_lines(out: &mut String, counters: &SyncCounters) {
    let rows = [
        ("scanned", counters.scanned),
        ("matched_root", counters.matched_root),
        ("derived", counters.derived),
        ("updated", counters.updated),
        ("skipped_already_correct", counters.skipped_already_correct),
        ("skipped_empty_title", counters.skipped_empty_title),
        ("skipped_over_limit", counters.skipped_over_limit),
        ("failed", counters.failed),
    ];
    for (key, value) in rows {
        out.push_str(&format!("{key}={value}\n"));
    }
}

fn change_lines(out: &mut String, heading: &str, changes: &[PlannedChange]) {
    out.push_str(&format!("{heading}={}\n", changes.len()));
    for change in changes {
        out.push_str(&format!(
            "{}\t{} => {}\n",
            change.id, change.old_title, change.new_title
        ));
    }
}

pub fn render_sync(report: &SyncReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("section_id={}\n", report.section_id));
    out.push_str(&format!("mode={}\n", mode(report.dry_run)));
    counter_lines(&mut out, &report.counters);
    let heading = if report.dry_run { "planned" } else { "applied" };
    change_lines(&mut out, heading, &report.changes);
    out
}

pub fn render_seasons(report: &SeasonReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("section_id={}\n", report.section_id));
    out.push_str(&format!("show_id={}\n", report.show_id));
    out.push_str(&format!("mode={}\n", mode(report.dry_run)));
    counter_lines(&mut out, &report.counters);
    let heading = if report.dry_run { "planned" } else { "applied" };
    change_lines(&mut out, heading, &report.changes);
    out
}

pub fn render_sections(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str(&format!("{}\t{}\t{}\n", section.id, section.kind, section.title));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dry_run_report() -> SyncReport {
        let now = Utc::now();
        SyncReport {
            section_id: "13".to_string(),
            dry_run: true,
            counters: SyncCounters {
                scanned: 2,
                matched_root: 2,
                derived: 2,
                ..Default::default()
            },
            changes: vec![
                PlannedChange {
                    id: "101".to_string(),
                    old_title: "Episode 36".to_string(),
                    new_title: "Fly By".to_string(),
                },
                PlannedChange {
                    id: "102".to_string(),
                    old_title: "Episode 7".to_string(),
                    new_title: "Warm Up".to_string(),
                },
            ],
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn dry_run_report_lists_every_planned_change() {
        let text = render_sync(&dry_run_report());
        assert!(text.starts_with("section_id=13\nmode=dry-run\nscanned=2\n"));
        assert!(text.contains("failed=0\n"));
        assert!(text.contains("planned=2\n"));
        assert!(text.contains("101\tEpisode 36 => Fly By\n"));
        assert!(text.contains("102\tEpisode 7 => Warm Up\n"));
    }

    #[test]
    fn season_report_shows_apply_mode() {
        let report = SeasonReport {
            section_id: "13".to_string(),
            show_id: "500".to_string(),
            dry_run: false,
            counters: SyncCounters {
                scanned: 1,
                derived: 1,
                updated: 1,
                ..Default::default()
            },
            changes: vec![PlannedChange {
                id: "501".to_string(),
                old_title: "Season 1".to_string(),
                new_title: "Beginner".to_string(),
            }],
        };
        let text = render_seasons(&report);
        assert!(text.starts_with("section_id=13\nshow_id=500\nmode=apply\n"));
        assert!(text.ends_with("applied=1\n501\tSeason 1 => Beginner\n"));
    }

    #[test]
    fn sections_are_tab_separated() {
        let sections = vec![Section {
            id: "13".to_string(),
            title: "Dance".to_string(),
            kind: "show".to_string(),
        }];
        assert_eq!(render_sections(&sections), "13\tshow\tDance\n");
    }
}
