use super::*;

fn keywords() -> Vec<String> {
    vec!["segmentation fault".into(), "FATAL".into(), "core dumped".into()]
}

#[test]
fn clean_tail_reports_no_hit() {
    let tail = "I0101 started\nI0101 serving requests\nI0101 checkpoint done";

    assert_eq!(scan_for_failure(tail.lines(), &keywords()), None);
}

#[test]
fn keyword_match_is_case_insensitive() {
    let tail = "ok\nSegmentation Fault at 0x0\nok";

    let hit = scan_for_failure(tail.lines(), &keywords()).expect("hit");

    assert_eq!(hit.line_no, 2);
    assert_eq!(hit.keyword, "segmentation fault");
    assert_eq!(hit.line, "Segmentation Fault at 0x0");
}

#[test]
fn first_matching_line_wins() {
    let tail = "fatal: lost quorum\n(core dumped)";

    let hit = scan_for_failure(tail.lines(), &keywords()).expect("hit");

    assert_eq!(hit.line_no, 1);
    assert_eq!(hit.keyword, "FATAL");
}

#[test]
fn scan_stops_at_first_hit() {
    let mut inspected = 0;
    let lines = ["ok", "fatal", "fatal", "fatal"].into_iter().inspect(|_| inspected += 1);

    let hit = scan_for_failure(lines, &keywords());

    assert!(hit.is_some());
    assert_eq!(inspected, 2);
}

#[test]
fn empty_keyword_list_never_matches() {
    assert_eq!(scan_for_failure("fatal".lines(), &[]), None);
}

#[test]
fn tail_lines_keeps_last_n() {
    let text = "1\n2\n3\n4\n5\n";

    assert_eq!(tail_lines(text, 2), vec!["4", "5"]);
    assert_eq!(tail_lines(text, 50), vec!["1", "2", "3", "4", "5"]);
    assert!(tail_lines("", 3).is_empty());
}
