use reportfilters_core::schema::reports::{
    beneficiary_payment_filters, BENEFICIARY_PAYMENT_REPORT, PROJECT_EMPLOYEE_SALARY_SLIP_REPORT,
};
use reportfilters_core::{FilterFieldDefinition, FilterRegistry, SchemaError};

#[test]
fn get_returns_fields_in_registration_order() {
    let fields = vec![
        FilterFieldDefinition::date("to_date", "To Date"),
        FilterFieldDefinition::link("project", "Project", "Project"),
        FilterFieldDefinition::data("zeta", "Zeta"),
        FilterFieldDefinition::data("alpha", "Alpha"),
    ];

    let mut builder = FilterRegistry::builder();
    builder.register("Ordering Report", fields.clone()).expect("register");
    let registry = builder.build();

    let set = registry.get("Ordering Report").expect("registered");
    assert_eq!(set.report_name(), "Ordering Report");
    assert_eq!(set.fields(), fields.as_slice());
}

#[test]
fn duplicate_report_registration_keeps_first_set() {
    let mut builder = FilterRegistry::builder();
    builder
        .register(BENEFICIARY_PAYMENT_REPORT, beneficiary_payment_filters())
        .expect("first registration");

    let err = builder
        .register(BENEFICIARY_PAYMENT_REPORT, vec![FilterFieldDefinition::data("other", "Other")])
        .unwrap_err();
    assert_eq!(err, SchemaError::DuplicateReport(BENEFICIARY_PAYMENT_REPORT.into()));

    let registry = builder.build();
    assert_eq!(
        registry.get(BENEFICIARY_PAYMENT_REPORT).unwrap().fields(),
        beneficiary_payment_filters().as_slice()
    );
}

#[test]
fn unknown_report_is_not_found() {
    let registry = FilterRegistry::builtin().expect("builtin registry");

    assert!(registry.get("Nonexistent Report").is_none());
    assert_eq!(
        registry.lookup("Nonexistent Report").unwrap_err(),
        SchemaError::ReportNotFound("Nonexistent Report".into())
    );
}

#[test]
fn builtin_reports_are_listed_in_order() {
    let registry = FilterRegistry::builtin().expect("builtin registry");
    let names: Vec<_> = registry.report_names().collect();
    assert_eq!(names, vec![BENEFICIARY_PAYMENT_REPORT, PROJECT_EMPLOYEE_SALARY_SLIP_REPORT]);
}

#[test]
fn salary_slip_company_filter_is_required_link() {
    let registry = FilterRegistry::builtin().expect("builtin registry");
    let set = registry.lookup(PROJECT_EMPLOYEE_SALARY_SLIP_REPORT).unwrap();

    let company = set.field("company").expect("company filter");
    assert!(company.required);
    assert_eq!(company.link_target(), Some("Company"));
    assert!(set.fields().iter().filter(|f| f.fieldname != "company").all(|f| !f.required));
}
