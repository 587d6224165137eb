use fanta_dashboard::forms::{EditField, EditForm, LoginForm, coerce_int};
use fanta_dashboard::state::Team;

fn sample_team() -> Team {
    Team {
        id: "t1".to_string(),
        name: "GOBBI FC".to_string(),
        owner: "Ciccio".to_string(),
        remaining_credits: 56,
        remaining_changes: 17,
        weekly_prizes: 2,
        total_winnings: 20,
        non_callable_players: "Rossi".to_string(),
    }
}

fn clear_focused(form: &mut EditForm) {
    for _ in 0..32 {
        form.backspace();
    }
}

#[test]
fn coerce_int_keeps_leading_integer() {
    assert_eq!(coerce_int("42"), 42);
    assert_eq!(coerce_int("  7"), 7);
    assert_eq!(coerce_int("12abc"), 12);
    assert_eq!(coerce_int("-5"), -5);
    assert_eq!(coerce_int("+9"), 9);
}

#[test]
fn coerce_int_collapses_non_numeric_to_zero() {
    assert_eq!(coerce_int(""), 0);
    assert_eq!(coerce_int("abc"), 0);
    assert_eq!(coerce_int("-"), 0);
    assert_eq!(coerce_int("€10"), 0);
}

#[test]
fn coerce_int_saturates_on_overflow() {
    assert_eq!(coerce_int("99999999999999999999999"), i64::MAX);
    assert_eq!(coerce_int("-99999999999999999999999"), i64::MIN);
}

#[test]
fn seeded_form_round_trips_untouched_team() {
    let team = sample_team();
    let form = EditForm::seed(&team);
    let patch = form.patch();

    assert_eq!(patch.remaining_credits, 56);
    assert_eq!(patch.remaining_changes, 17);
    assert_eq!(patch.weekly_prizes, 2);
    assert_eq!(patch.total_winnings, 20);
    assert_eq!(patch.non_callable_players, "Rossi");
}

#[test]
fn non_numeric_draft_is_submitted_as_zero() {
    let mut form = EditForm::seed(&sample_team());
    assert_eq!(form.focus, EditField::RemainingCredits);
    clear_focused(&mut form);
    for c in "abc".chars() {
        form.input(c);
    }

    form.next_field();
    form.next_field();
    assert_eq!(form.focus, EditField::WeeklyPrizes);
    clear_focused(&mut form);

    let patch = form.patch();
    assert_eq!(patch.remaining_credits, 0);
    assert_eq!(patch.weekly_prizes, 0);
    // Untouched fields still travel with the patch.
    assert_eq!(patch.remaining_changes, 17);
    assert_eq!(patch.total_winnings, 20);
}

#[test]
fn field_focus_wraps_both_ways() {
    let mut form = EditForm::seed(&sample_team());
    form.prev_field();
    assert_eq!(form.focus, EditField::NonCallablePlayers);
    form.next_field();
    assert_eq!(form.focus, EditField::RemainingCredits);
}

#[test]
fn text_field_accepts_free_text() {
    let mut form = EditForm::seed(&sample_team());
    form.prev_field();
    clear_focused(&mut form);
    for c in "Bianchi, Verdi".chars() {
        form.input(c);
    }
    assert_eq!(form.patch().non_callable_players, "Bianchi, Verdi");
}

#[test]
fn login_form_masks_and_hides_password_from_debug() {
    let mut form = LoginForm::default();
    for c in "segreto".chars() {
        form.input(c);
    }
    assert_eq!(form.password(), "segreto");
    assert_eq!(form.masked().chars().count(), 7);
    assert!(!form.masked().contains("segreto"));
    assert!(!format!("{form:?}").contains("segreto"));

    form.backspace();
    assert_eq!(form.password(), "segret");
}
