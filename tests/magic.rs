use chrono::NaiveDate;
use magodo::clock::FixedClock;
use magodo::error::MagodoError;
use magodo::grammar::ParseMode;
use magodo::magic::MagicTodo;
use magodo::model::Todo;
use magodo::spells::builtin::{ADD_CREATE_DATE, GROUP_TAGS, VALIDATE_PREFIX};
use magodo::spells::Spellbook;
use rstest::{fixture, rstest};
use std::sync::Arc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 10).unwrap()
}

#[fixture]
fn book() -> Arc<Spellbook> {
    Arc::new(Spellbook::magic().with_clock(FixedClock::at(today(), 9, 30).unwrap()))
}

#[fixture]
fn strict_book() -> Arc<Spellbook> {
    Arc::new(
        Spellbook::magic()
            .with_mode(ParseMode::Strict)
            .with_clock(FixedClock::at(today(), 9, 30).unwrap()),
    )
}

#[rstest]
fn completion_shorthand_becomes_done_todo(book: Arc<Spellbook>) {
    let magic = MagicTodo::from_line("x:1030 2022-01-12 Some done todo.", book).unwrap();

    let expected_base = Todo::new("Some done todo. dtime:1030")
        .with_done(true)
        .with_create_date(NaiveDate::from_ymd_opt(2022, 1, 12))
        .with_metadata([("dtime".to_string(), "1030".to_string())].into());
    assert_eq!(magic.original(), &expected_base);

    assert!(magic.done());
    assert_eq!(magic.done_date(), Some(today()));
    assert_eq!(magic.metadata_value_pairs(), vec![("ctime", "0930"), ("dtime", "1030")]);
}

#[rstest]
#[case("(A) call mom +family due:2022-02-01")]
#[case("o @home buy milk")]
#[case("x:0700 (B) 2021-12-01 morning run @gym")]
#[case("o water plants | @home")]
fn reading_written_line_is_stable(book: Arc<Spellbook>, #[case] line: &str) {
    let once = MagicTodo::from_line(line, book.clone()).unwrap();
    let twice = MagicTodo::from_line(&once.to_line(), book).unwrap();
    assert_eq!(twice.todo(), once.todo());
    assert_eq!(twice.to_line(), once.to_line());
}

#[rstest]
fn strict_spellbook_reads_and_writes_open_marker(strict_book: Arc<Spellbook>) {
    let magic = MagicTodo::from_line("o buy milk", strict_book.clone()).unwrap();
    assert!(!magic.done());
    assert!(magic.priority().is_default());
    assert_eq!(magic.desc(), "buy milk | ctime:0930");
    assert_eq!(magic.to_line(), "(O) 2022-01-10 buy milk | ctime:0930");

    let again = MagicTodo::from_line(&magic.to_line(), strict_book).unwrap();
    assert_eq!(again.todo(), magic.todo());
}

#[rstest]
#[case("(A) call mom +family due:2022-02-01")]
#[case("o @home buy milk")]
#[case("x:0700 (B) 2021-12-01 morning run @gym")]
#[case("o water plants | @home")]
fn strict_written_line_is_stable(strict_book: Arc<Spellbook>, #[case] line: &str) {
    let once = MagicTodo::from_line(line, strict_book.clone()).unwrap();
    let twice = MagicTodo::from_line(&once.to_line(), strict_book).unwrap();
    assert_eq!(twice.todo(), once.todo());
    assert_eq!(twice.to_line(), once.to_line());
}

#[rstest]
#[case("(A) x:1030 -- call mom", "(A) 2022-01-10 x:1030 -- call mom ctime:0930")]
#[case(
    "(A) x:1030 2022-13-01 call mom",
    "(A) 2022-01-10 x:1030 2022-13-01 call mom ctime:0930"
)]
fn unreadable_completion_stays_open(
    book: Arc<Spellbook>,
    #[case] line: &str,
    #[case] expected: &str,
) {
    let magic = MagicTodo::from_line(line, book.clone()).unwrap();
    assert!(!magic.done());
    assert_eq!(magic.priority().letter(), 'A');
    assert_eq!(magic.to_line(), expected);

    let again = MagicTodo::from_line(&magic.to_line(), book).unwrap();
    assert_eq!(again.todo(), magic.todo());
}

#[rstest]
#[case("plain line")]
#[case("(a) lower-case priority")]
#[case("x:12 too short")]
fn missing_status_is_rejected(book: Arc<Spellbook>, #[case] line: &str) {
    let err = MagicTodo::from_line(line, book).unwrap_err();
    assert!(matches!(err, MagodoError::ValidateSpellFailed { .. }), "{line:?}");
    assert!(err.chain().contains("magic todos must have an explicit priority"));
}

#[rstest]
fn interleaved_tags_are_left_in_place(book: Arc<Spellbook>) {
    let magic = MagicTodo::from_line("o talk to +team about @office move", book).unwrap();
    assert_eq!(magic.desc(), "talk to +team about @office move ctime:0930");
}

#[test]
fn custom_spellbook_runs_only_its_spells() {
    let book = Spellbook::plain(ParseMode::Permissive)
        .with_clock(FixedClock::at(today(), 9, 30).unwrap())
        .validate(VALIDATE_PREFIX)
        .transform(ADD_CREATE_DATE)
        .transform(GROUP_TAGS);
    let magic = MagicTodo::from_line("(C) @desk tidy up", Arc::new(book)).unwrap();
    assert_eq!(magic.to_line(), "(C) 2022-01-10 tidy up | @desk");
}

trait MetadataPairs {
    fn metadata_value_pairs(&self) -> Vec<(&str, &str)>;
}

impl MetadataPairs for MagicTodo {
    fn metadata_value_pairs(&self) -> Vec<(&str, &str)> {
        self.metadata()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}
