//! Workflow rule tests over the public domain model: transition tables,
//! submit guards, scoring, averages and report rendering.

use chrono::NaiveDate;
use uuid::Uuid;

use internship_placement_lib::models::{
    PlacementStatus, RequestStatus, ResultRow, WeeklyLogStatus, average_100,
    render_results_document, score_summary, validate_company_choice, week_bounds,
};

#[test]
fn request_submission_requires_exactly_one_company_choice() {
    // neither a selected nor a proposed company
    assert!(validate_company_choice(None, "").is_err());
    assert!(validate_company_choice(None, "   ").is_err());

    // both at once
    assert!(validate_company_choice(Some(Uuid::new_v4()), "Acme Ltd").is_err());

    // exactly one
    assert!(validate_company_choice(Some(Uuid::new_v4()), "").is_ok());
    assert!(validate_company_choice(None, "Acme Ltd").is_ok());
}

#[test]
fn request_machine_walks_the_happy_path_only_forward() {
    use RequestStatus::*;

    let path = [
        Draft,
        Submitted,
        UnderReview,
        Recommended,
        AcceptanceUploaded,
        AcceptanceVerified,
    ];
    for pair in path.windows(2) {
        assert!(
            pair[0].can_transition(pair[1]),
            "{} -> {} should be legal",
            pair[0],
            pair[1]
        );
        assert!(
            !pair[1].can_transition(pair[0]),
            "{} -> {} should be refused",
            pair[1],
            pair[0]
        );
    }

    // Verification cannot be reached by skipping the upload
    assert!(!Submitted.can_transition(AcceptanceVerified));
    assert!(!Recommended.can_transition(AcceptanceVerified));

    // Terminal states stay terminal
    for to in path {
        assert!(!Rejected.can_transition(to));
        assert!(!AcceptanceVerified.can_transition(to));
    }
}

#[test]
fn returned_request_can_still_receive_a_letter() {
    use RequestStatus::*;

    assert!(Recommended.can_transition(ReturnedForAcceptance));
    assert!(ReturnedForAcceptance.can_transition(AcceptanceUploaded));
    assert!(ReturnedForAcceptance.can_transition(ReturnedForAcceptance));

    // but an uploaded letter blocks the return branch
    assert!(!AcceptanceUploaded.can_transition(ReturnedForAcceptance));
}

#[test]
fn weekly_log_machine_round_trips_through_return() {
    use WeeklyLogStatus::*;

    assert!(Draft.can_transition(Submitted));
    assert!(Submitted.can_transition(ReturnedForEdit));
    assert!(ReturnedForEdit.can_transition(Submitted));
    assert!(Submitted.can_transition(ApprovedByCompany));

    // approval is final
    assert!(!ApprovedByCompany.can_transition(Submitted));
    assert!(!ApprovedByCompany.can_transition(ReturnedForEdit));
    assert!(!ApprovedByCompany.can_transition(Draft));
}

#[test]
fn placement_machine_matches_the_lifecycle() {
    use PlacementStatus::*;

    assert!(PendingStudentAck.can_transition(Active));
    assert!(Active.can_transition(OnHold));
    assert!(OnHold.can_transition(Active));
    assert!(Active.can_transition(Completed));
    assert!(Active.can_transition(Terminated));

    for status in [PendingStudentAck, Active, OnHold, Completed, Terminated] {
        assert!(!Completed.can_transition(status));
        assert!(!Terminated.can_transition(status));
    }
}

#[test]
fn industry_scoring_matches_the_thirteen_item_form() {
    // all 13 ratings at 4
    let summary = score_summary(&vec![Some(4i16); 13]);
    assert_eq!(summary.total, 52);
    assert_eq!(summary.max, 65);
    assert_eq!(summary.out_of_100, 80.0);
    assert_eq!(summary.out_of_10, 8.0);
}

#[test]
fn academic_scoring_matches_the_five_item_form() {
    let summary = score_summary(&vec![Some(5i16); 5]);
    assert_eq!(summary.total, 25);
    assert_eq!(summary.max, 25);
    assert_eq!(summary.out_of_100, 100.0);
    assert_eq!(summary.out_of_10, 10.0);
}

#[test]
fn scores_stay_in_range_with_unset_items() {
    for filled in 0..=13usize {
        let mut ratings = vec![None; 13];
        for rating in ratings.iter_mut().take(filled) {
            *rating = Some(3);
        }
        let summary = score_summary(&ratings);
        assert!((0.0..=100.0).contains(&summary.out_of_100));
        assert_eq!(summary.out_of_10, summary.out_of_100 / 10.0);
        assert_eq!(summary.max, 65);
    }
}

#[test]
fn average_exists_only_when_both_sides_are_submitted() {
    assert_eq!(average_100(Some(80.0), Some(90.0)), Some(85.0));

    // a draft academic evaluation leaves the average undefined, not 40
    assert_eq!(average_100(Some(80.0), None), None);
    assert_eq!(average_100(None, Some(90.0)), None);
    assert_eq!(average_100(None, None), None);
}

#[test]
fn report_machine_submits_then_receives_once() {
    use internship_placement_lib::models::ReportStatus::*;

    assert!(Draft.can_transition(Submitted));
    assert!(Submitted.can_transition(Received));

    // acknowledgement is never reversed
    assert!(!Received.can_transition(Submitted));
    assert!(!Received.can_transition(Draft));
    assert!(!Submitted.can_transition(Draft));
}

#[test]
fn exported_document_rounds_and_dashes_absent_scores() {
    let rows = vec![
        ResultRow {
            placement_id: Uuid::new_v4(),
            reg_no: "REG014".to_string(),
            name: "Amina Okafor".to_string(),
            company: "Acme Ltd".to_string(),
            industry_100: Some(80.0),
            academic_100: Some(90.0),
            average_100: average_100(Some(80.0), Some(90.0)),
        },
        ResultRow {
            placement_id: Uuid::new_v4(),
            reg_no: "REG015".to_string(),
            name: "Brian Chen".to_string(),
            company: "Globex".to_string(),
            industry_100: Some(76.5),
            academic_100: None,
            average_100: None,
        },
    ];

    let doc = render_results_document("Internship Results Report", "Generated: test", &rows);

    let first = doc.lines().nth(4).unwrap();
    assert!(first.contains("REG014"));
    assert!(first.contains("85"));

    let second = doc.lines().nth(5).unwrap();
    assert!(second.contains("77")); // 76.5 rounds up
    assert!(second.matches('-').count() >= 2); // absent academic and average
}

#[test]
fn week_bounds_are_monday_through_sunday() {
    // 2026-08-06 is a Thursday
    let thursday = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
    let (start, end) = week_bounds(thursday);

    assert_eq!(start, NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
    assert_eq!(end, NaiveDate::from_ymd_opt(2026, 8, 9).unwrap());
    assert_eq!((end - start).num_days(), 6);

    // a Sunday belongs to the week that started the previous Monday
    let (sunday_start, _) = week_bounds(end);
    assert_eq!(sunday_start, start);
}
