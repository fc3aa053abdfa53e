//! End-to-end engine tests against in-memory SQLite databases.

use std::path::Path;

use dqc_engine::source::{DataSource, DuplicateGroup, SourceError};
use dqc_engine::{QualityChecker, SqliteSource};
use dqc_model::{CheckFlags, CheckKind, CheckStatus, CodeList, Finding, RuleSet, RunSummary};

fn seeded_checker(batch: &str) -> QualityChecker<SqliteSource> {
    let source = SqliteSource::open_in_memory().expect("open in-memory db");
    source.connection().execute_batch(batch).expect("seed db");
    QualityChecker::new(source)
}

fn flags(kinds: &[CheckKind]) -> CheckFlags {
    let mut flags = CheckFlags::default();
    for kind in kinds {
        flags.set(*kind, true);
    }
    flags
}

fn rule(table: &str, field: &str, kinds: &[CheckKind]) -> RuleSet {
    let mut rules = RuleSet::new();
    rules.insert(table, field, String::new(), flags(kinds));
    rules
}

fn find<'a>(findings: &'a [Finding], kind: CheckKind) -> &'a Finding {
    findings
        .iter()
        .find(|f| f.check == kind)
        .unwrap_or_else(|| panic!("no {kind} finding"))
}

#[test]
fn null_and_blank_checks_on_users_email() {
    let mut checker = seeded_checker(
        "CREATE TABLE users (email TEXT);
         INSERT INTO users VALUES (NULL), (''), ('a@b.com');",
    );
    checker.set_rules(rule(
        "users",
        "email",
        &[CheckKind::NullCheck, CheckKind::BlankCheck],
    ));

    let report = checker.run_all();
    let users = report.table("users").expect("users entry");
    assert_eq!(users.findings.len(), 2);

    let null = find(&users.findings, CheckKind::NullCheck);
    assert_eq!(null.status, CheckStatus::Fail);
    assert_eq!(null.message, "Found 1 NULL values out of 3 total rows");

    let blank = find(&users.findings, CheckKind::BlankCheck);
    assert_eq!(blank.status, CheckStatus::Fail);
    assert_eq!(blank.message, "Found 1 blank values out of 3 total rows");
}

#[test]
fn clean_column_passes_null_and_blank() {
    let mut checker = seeded_checker(
        "CREATE TABLE users (email TEXT);
         INSERT INTO users VALUES ('a@b.com'), ('c@d.org');",
    );
    checker.set_rules(rule(
        "users",
        "email",
        &[CheckKind::NullCheck, CheckKind::BlankCheck],
    ));

    let report = checker.run_all();
    let findings = &report.table("users").expect("users entry").findings;
    assert_eq!(find(findings, CheckKind::NullCheck).message, "No NULL values found");
    assert_eq!(find(findings, CheckKind::BlankCheck).message, "No blank values found");
}

#[test]
fn duplicate_excess_is_sum_of_count_minus_one() {
    let mut checker = seeded_checker(
        "CREATE TABLE t (v INTEGER);
         INSERT INTO t VALUES (1), (1), (2), (3), (3), (3);",
    );
    checker.set_rules(rule("t", "v", &[CheckKind::DuplicateCheck]));

    let report = checker.run_all();
    let finding = &report.table("t").expect("t entry").findings[0];
    assert_eq!(finding.status, CheckStatus::Fail);
    assert_eq!(finding.message, "Found 3 duplicate values across 2 distinct values");
}

#[test]
fn unique_column_passes_duplicate_check() {
    let mut checker = seeded_checker(
        "CREATE TABLE t (v INTEGER);
         INSERT INTO t VALUES (1), (2), (3);",
    );
    checker.set_rules(rule("t", "v", &[CheckKind::DuplicateCheck]));

    let report = checker.run_all();
    let finding = &report.table("t").expect("t entry").findings[0];
    assert_eq!(finding.status, CheckStatus::Pass);
    assert_eq!(finding.message, "No duplicate values found");
}

#[test]
fn system_codes_match_case_insensitively() {
    let mut checker = seeded_checker(
        "CREATE TABLE orders (status TEXT);
         INSERT INTO orders VALUES ('NEW'), ('shipped'), ('New');",
    );
    checker.set_rules(rule("orders", "status", &[CheckKind::SystemCodesCheck]));
    let mut codes = CodeList::new();
    codes.insert("orders", "status", vec!["new".to_string(), "SHIPPED".to_string()]);
    checker.set_codes(codes);

    let report = checker.run_all();
    let finding = &report.table("orders").expect("orders entry").findings[0];
    assert_eq!(finding.status, CheckStatus::Pass);
    assert_eq!(finding.message, "All 3 values are valid system codes");
}

#[test]
fn unknown_system_code_fails_with_declared_count() {
    let mut checker = seeded_checker(
        "CREATE TABLE orders (status TEXT);
         INSERT INTO orders VALUES ('NEW'), ('BOGUS'), ('NEW');",
    );
    checker.set_rules(rule("orders", "status", &[CheckKind::SystemCodesCheck]));
    let mut codes = CodeList::new();
    codes.insert(
        "orders",
        "status",
        vec!["NEW".to_string(), "SHIPPED".to_string(), "DONE".to_string()],
    );
    checker.set_codes(codes);

    let report = checker.run_all();
    let finding = &report.table("orders").expect("orders entry").findings[0];
    assert_eq!(finding.status, CheckStatus::Fail);
    assert_eq!(
        finding.message,
        "Found 1 invalid system codes out of 3 values (Valid codes: 3 defined)"
    );
}

#[test]
fn no_declared_codes_passes_vacuously() {
    let mut checker = seeded_checker(
        "CREATE TABLE orders (status TEXT);
         INSERT INTO orders VALUES ('ANYTHING'), ('GOES');",
    );
    checker.set_rules(rule("orders", "status", &[CheckKind::SystemCodesCheck]));

    let report = checker.run_all();
    let finding = &report.table("orders").expect("orders entry").findings[0];
    assert_eq!(finding.status, CheckStatus::Pass);
    assert_eq!(finding.message, "All 2 values are valid system codes");
}

#[test]
fn absent_table_leaves_no_report_entry() {
    let mut checker = seeded_checker("CREATE TABLE present (x TEXT);");
    let mut rules = rule("present", "x", &[CheckKind::NullCheck]);
    rules.insert("missing", "x", String::new(), flags(&[CheckKind::NullCheck]));
    checker.set_rules(rules);

    let report = checker.run_all();
    assert!(report.table("missing").is_none());
    // Present but empty still gets its data-existence warning.
    let present = report.table("present").expect("present entry");
    assert_eq!(present.findings[0].check, CheckKind::DataExistence);
}

#[test]
fn missing_column_yields_single_fail_finding() {
    let mut checker = seeded_checker(
        "CREATE TABLE users (id INTEGER);
         INSERT INTO users VALUES (1);",
    );
    checker.set_rules(rule(
        "users",
        "email",
        &[CheckKind::NullCheck, CheckKind::BlankCheck, CheckKind::EmailCheck],
    ));

    let report = checker.run_all();
    let findings = &report.table("users").expect("users entry").findings;
    assert_eq!(findings.len(), 1, "existence failure suppresses the other checks");
    assert_eq!(findings[0].check, CheckKind::ColumnExistence);
    assert_eq!(findings[0].status, CheckStatus::Fail);
    assert_eq!(
        findings[0].message,
        "Column 'email' does not exist in table 'users'"
    );
}

#[test]
fn empty_table_yields_single_warning() {
    let mut checker = seeded_checker("CREATE TABLE users (email TEXT);");
    checker.set_rules(rule(
        "users",
        "email",
        &[CheckKind::NullCheck, CheckKind::EmailCheck],
    ));

    let report = checker.run_all();
    let findings = &report.table("users").expect("users entry").findings;
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].check, CheckKind::DataExistence);
    assert_eq!(findings[0].status, CheckStatus::Warning);
    assert_eq!(findings[0].message, "Table 'users' has no data");
}

#[test]
fn email_sample_is_bounded_at_one_hundred_rows() {
    let mut seed = String::from("CREATE TABLE users (email TEXT);\n");
    for i in 0..100 {
        seed.push_str(&format!("INSERT INTO users VALUES ('user{i}@example.com');\n"));
    }
    seed.push_str("INSERT INTO users VALUES ('not-an-email');\n");
    let mut checker = seeded_checker(&seed);
    checker.set_rules(rule("users", "email", &[CheckKind::EmailCheck]));

    let report = checker.run_all();
    let finding = &report.table("users").expect("users entry").findings[0];
    // Row 101 is outside the sample; the full population still shows in the
    // message.
    assert_eq!(finding.status, CheckStatus::Pass);
    assert_eq!(finding.message, "All 101 email formats appear valid");
}

#[test]
fn invalid_email_as_hundredth_row_is_still_sampled() {
    let mut seed = String::from("CREATE TABLE users (email TEXT);\n");
    for i in 0..99 {
        seed.push_str(&format!("INSERT INTO users VALUES ('user{i}@example.com');\n"));
    }
    seed.push_str("INSERT INTO users VALUES ('not-an-email');\n");
    let mut checker = seeded_checker(&seed);
    checker.set_rules(rule("users", "email", &[CheckKind::EmailCheck]));

    let report = checker.run_all();
    let finding = &report.table("users").expect("users entry").findings[0];
    // The hundredth qualifying row is the last one inside the sample.
    assert_eq!(finding.status, CheckStatus::Fail);
    assert_eq!(finding.message, "Found 1 invalid email formats out of 100 values");
}

#[test]
fn hundredth_distinct_system_code_is_still_sampled() {
    let mut seed = String::from("CREATE TABLE orders (status TEXT);\n");
    for i in 0..99 {
        seed.push_str(&format!("INSERT INTO orders VALUES ('CODE{i:03}');\n"));
    }
    seed.push_str("INSERT INTO orders VALUES ('BOGUS');\n");
    let mut checker = seeded_checker(&seed);
    checker.set_rules(rule("orders", "status", &[CheckKind::SystemCodesCheck]));
    let mut codes = CodeList::new();
    codes.insert(
        "orders",
        "status",
        (0..99).map(|i| format!("CODE{i:03}")).collect(),
    );
    checker.set_codes(codes);

    let report = checker.run_all();
    let finding = &report.table("orders").expect("orders entry").findings[0];
    // All 100 distinct values fit in the sample, so the odd one out is seen.
    assert_eq!(finding.status, CheckStatus::Fail);
    assert_eq!(
        finding.message,
        "Found 1 invalid system codes out of 100 values (Valid codes: 99 defined)"
    );
}

#[test]
fn invalid_email_inside_sample_fails() {
    let mut checker = seeded_checker(
        "CREATE TABLE users (email TEXT);
         INSERT INTO users VALUES ('not-an-email'), ('a@b.com'), ('  c@d.org  ');",
    );
    checker.set_rules(rule("users", "email", &[CheckKind::EmailCheck]));

    let report = checker.run_all();
    let finding = &report.table("users").expect("users entry").findings[0];
    assert_eq!(finding.status, CheckStatus::Fail);
    assert_eq!(finding.message, "Found 1 invalid email formats out of 3 values");
}

#[test]
fn value_checks_without_qualifying_values_emit_no_finding() {
    let mut checker = seeded_checker(
        "CREATE TABLE users (email TEXT, id INTEGER);
         INSERT INTO users VALUES (NULL, 1), ('', 2);",
    );
    checker.set_rules(rule(
        "users",
        "email",
        &[CheckKind::NullCheck, CheckKind::EmailCheck, CheckKind::SystemCodesCheck],
    ));

    let report = checker.run_all();
    let findings = &report.table("users").expect("users entry").findings;
    // Only the null check reports; the sampled checks are skipped outright.
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].check, CheckKind::NullCheck);

    let summary = RunSummary::from_report(&report);
    assert_eq!(summary.total, 1);
}

#[test]
fn numeric_phone_date_and_shape_checks() {
    let mut checker = seeded_checker(
        "CREATE TABLE contacts (amount TEXT, phone TEXT, joined TEXT, name TEXT);
         INSERT INTO contacts VALUES ('12.50', '+31612345678', '2024-01-31', 'Ada Lovelace');
         INSERT INTO contacts VALUES ('oops', '12345', '31/12/2024', 'Bj\u{f6}rk;');",
    );
    let mut rules = RuleSet::new();
    rules.insert("contacts", "amount", String::new(), flags(&[CheckKind::NumericCheck]));
    rules.insert("contacts", "phone", String::new(), flags(&[CheckKind::PhoneNumberCheck]));
    rules.insert("contacts", "joined", String::new(), flags(&[CheckKind::DateCheck]));
    rules.insert(
        "contacts",
        "name",
        String::new(),
        flags(&[CheckKind::SpecialCharactersCheck, CheckKind::LanguageCheck]),
    );
    checker.set_rules(rules);

    let report = checker.run_all();
    let findings = &report.table("contacts").expect("contacts entry").findings;

    assert_eq!(
        find(findings, CheckKind::NumericCheck).message,
        "Found 1 non-numeric values out of 2 values"
    );
    assert_eq!(
        find(findings, CheckKind::PhoneNumberCheck).message,
        "Found 1 invalid phone numbers out of 2 values"
    );
    assert_eq!(
        find(findings, CheckKind::DateCheck).message,
        "All 2 date formats appear valid"
    );
    assert_eq!(
        find(findings, CheckKind::SpecialCharactersCheck).message,
        "Found 1 values with special characters out of 2 values"
    );
    assert_eq!(
        find(findings, CheckKind::LanguageCheck).message,
        "Found 1 values with non-ASCII characters out of 2 values"
    );
}

#[test]
fn inert_flags_produce_no_findings() {
    let mut checker = seeded_checker(
        "CREATE TABLE t (v TEXT);
         INSERT INTO t VALUES ('x');",
    );
    checker.set_rules(rule(
        "t",
        "v",
        &[CheckKind::MaxValueCheck, CheckKind::MinValueCheck, CheckKind::MaxCountCheck],
    ));

    let report = checker.run_all();
    assert!(report.is_empty());
}

#[test]
fn run_for_table_scopes_to_one_table() {
    let mut checker = seeded_checker(
        "CREATE TABLE a (x TEXT); INSERT INTO a VALUES ('1');
         CREATE TABLE b (y TEXT); INSERT INTO b VALUES (NULL);",
    );
    let mut rules = rule("a", "x", &[CheckKind::NullCheck]);
    rules.insert("b", "y", String::new(), flags(&[CheckKind::NullCheck]));
    checker.set_rules(rules);

    let report = checker.run_for_table("b");
    assert!(report.table("a").is_none());
    assert_eq!(report.table("b").expect("b entry").findings.len(), 1);

    assert!(checker.run_for_table("unconfigured").is_empty());
}

#[test]
fn failed_reload_keeps_previous_rules() {
    let mut checker = seeded_checker("CREATE TABLE t (v TEXT);");
    checker.set_rules(rule("t", "v", &[CheckKind::NullCheck]));

    let err = checker.load_rules(Path::new("/nonexistent/rules.csv"));
    assert!(err.is_err());
    assert_eq!(checker.table_count(), 1, "previous rule set survives a failed load");
    assert!(checker.rules().table("t").is_some());
}

#[test]
fn failing_values_for_shape_code_and_duplicate_checks() {
    let mut checker = seeded_checker(
        "CREATE TABLE users (email TEXT, status TEXT);
         INSERT INTO users VALUES ('a@b.com', 'NEW');
         INSERT INTO users VALUES ('bad-one', 'BOGUS');
         INSERT INTO users VALUES ('bad-two', 'NEW');",
    );
    let mut codes = CodeList::new();
    codes.insert("users", "status", vec!["NEW".to_string()]);
    checker.set_codes(codes);

    let emails = checker
        .failing_values("users", "email", CheckKind::EmailCheck, 10)
        .expect("email values");
    assert_eq!(emails, ["bad-one", "bad-two"]);

    let capped = checker
        .failing_values("users", "email", CheckKind::EmailCheck, 1)
        .expect("email values");
    assert_eq!(capped, ["bad-one"]);

    let statuses = checker
        .failing_values("users", "status", CheckKind::SystemCodesCheck, 10)
        .expect("status values");
    assert_eq!(statuses, ["BOGUS"]);

    let duplicates = checker
        .failing_values("users", "status", CheckKind::DuplicateCheck, 10)
        .expect("duplicate values");
    assert_eq!(duplicates, ["NEW"]);

    let nulls = checker
        .failing_values("users", "email", CheckKind::NullCheck, 10)
        .expect("null values");
    assert!(nulls.is_empty(), "null findings carry no representable values");
}

/// Source double whose aggregate queries fail, for exercising the ERROR tier.
struct BrokenSource;

fn broken() -> SourceError {
    SourceError::Query(rusqlite::Error::InvalidQuery)
}

impl DataSource for BrokenSource {
    fn table_names(&self) -> Result<Vec<String>, SourceError> {
        Ok(vec!["t".to_string()])
    }

    fn table_exists(&self, _table: &str) -> Result<bool, SourceError> {
        Ok(true)
    }

    fn column_names(&self, _table: &str) -> Result<Vec<String>, SourceError> {
        Ok(vec!["v".to_string()])
    }

    fn column_exists(&self, _table: &str, _column: &str) -> Result<bool, SourceError> {
        Ok(true)
    }

    fn count_rows(&self, _table: &str) -> Result<u64, SourceError> {
        Ok(3)
    }

    fn count_null(&self, _table: &str, _column: &str) -> Result<u64, SourceError> {
        Err(broken())
    }

    fn count_blank(&self, _table: &str, _column: &str) -> Result<u64, SourceError> {
        Err(broken())
    }

    fn count_non_blank(&self, _table: &str, _column: &str) -> Result<u64, SourceError> {
        Err(broken())
    }

    fn sample_non_blank(
        &self,
        _table: &str,
        _column: &str,
        _limit: u64,
    ) -> Result<Vec<String>, SourceError> {
        Err(broken())
    }

    fn sample_distinct_non_blank(
        &self,
        _table: &str,
        _column: &str,
        _limit: u64,
    ) -> Result<Vec<String>, SourceError> {
        Err(broken())
    }

    fn duplicate_groups(
        &self,
        _table: &str,
        _column: &str,
    ) -> Result<Vec<DuplicateGroup>, SourceError> {
        Err(broken())
    }
}

#[test]
fn query_failure_folds_into_one_error_finding() {
    let mut checker = QualityChecker::new(BrokenSource);
    checker.set_rules(rule(
        "t",
        "v",
        &[CheckKind::NullCheck, CheckKind::BlankCheck, CheckKind::DuplicateCheck],
    ));

    let report = checker.run_all();
    let findings = &report.table("t").expect("t entry").findings;
    assert_eq!(findings.len(), 1, "first failure stops the field's remaining checks");
    assert_eq!(findings[0].check, CheckKind::DatabaseError);
    assert_eq!(findings[0].status, CheckStatus::Error);
    assert!(findings[0].message.starts_with("Database error: "));

    let summary = RunSummary::from_report(&report);
    assert_eq!(summary.failed, 1);
    assert!(summary.has_failures());
}
