use crate::dsl::validate::SchemaError;
use crate::schema::field_catalog::{DefaultValue, FilterFieldDefinition};
use crate::schema::registry::FilterRegistry;

pub const BENEFICIARY_PAYMENT_REPORT: &str = "Beneficiary Payment Report";
pub const PROJECT_EMPLOYEE_SALARY_SLIP_REPORT: &str = "Project Employee Salary Slip Report";

/// Payments to beneficiaries, filtered by name and payment date.
pub fn beneficiary_payment_filters() -> Vec<FilterFieldDefinition> {
    vec![
        FilterFieldDefinition::data("beneficiary_name", "Beneficiary Name"),
        FilterFieldDefinition::date("from_date", "From Date").with_default(DefaultValue::MonthStart),
        FilterFieldDefinition::date("to_date", "To Date").with_default(DefaultValue::MonthEnd),
    ]
}

/// Salary slips per project employee. Company is mandatory.
pub fn project_employee_salary_slip_filters() -> Vec<FilterFieldDefinition> {
    vec![
        FilterFieldDefinition::link("company", "Company", "Company").required(),
        FilterFieldDefinition::link("employee", "Employee", "Employee"),
        FilterFieldDefinition::link("project", "Project", "Project"),
        FilterFieldDefinition::link("designation", "Designation", "Designation"),
        FilterFieldDefinition::date("from_date", "From Date").with_default(DefaultValue::MonthStart),
        FilterFieldDefinition::date("to_date", "To Date").with_default(DefaultValue::MonthEnd),
    ]
}

/// Registry with the payroll reports compiled into the binary.
pub fn builtin_registry() -> Result<FilterRegistry, SchemaError> {
    let mut builder = FilterRegistry::builder();
    builder.register(BENEFICIARY_PAYMENT_REPORT, beneficiary_payment_filters())?;
    builder.register(PROJECT_EMPLOYEE_SALARY_SLIP_REPORT, project_employee_salary_slip_filters())?;
    Ok(builder.build())
}

impl FilterRegistry {
    pub fn builtin() -> Result<Self, SchemaError> {
        builtin_registry()
    }
}
