//! Built-in template catalog
//!
//! Templates are built once and only ever handed out by reference; the
//! mutator copies them into the session with fresh ids.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::models::{make_field, Field, FieldOverrides, FieldType, FormDocument};

/// A named, reusable document
#[derive(Debug, Clone)]
pub struct Template {
    pub id: &'static str,
    pub document: FormDocument,
}

/// Listing entry for the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub id: &'static str,
    pub title: String,
    pub field_count: usize,
}

static CATALOG: Lazy<BTreeMap<&'static str, Template>> = Lazy::new(|| {
    [
        ("contact", contact()),
        ("survey", survey()),
        ("registration", registration()),
        ("tax-return", tax_return()),
    ]
    .into_iter()
    .map(|(id, document)| (id, Template { id, document }))
    .collect()
});

/// Look up a template by id
pub fn get(id: &str) -> Option<&'static Template> {
    CATALOG.get(id)
}

/// All templates, ordered by id
pub fn list() -> Vec<TemplateSummary> {
    CATALOG
        .values()
        .map(|t| TemplateSummary {
            id: t.id,
            title: t.document.title.clone(),
            field_count: t.document.fields.len(),
        })
        .collect()
}

fn field(id: &str, label: &str) -> FieldOverrides {
    FieldOverrides::default().id(id).label(label)
}

fn doc(title: &str, description: &str, fields: Vec<Field>) -> FormDocument {
    FormDocument {
        title: title.to_string(),
        description: description.to_string(),
        fields,
        ..FormDocument::default()
    }
}

fn heading(id: &str, text: &str) -> Field {
    make_field(
        FieldType::Heading,
        FieldOverrides::default().id(id).label(text).placeholder(""),
    )
}

fn separator(id: &str) -> Field {
    make_field(
        FieldType::Separator,
        FieldOverrides::default().id(id).label("").placeholder(""),
    )
}

fn contact() -> FormDocument {
    doc(
        "Contact Form",
        "Get in touch with us",
        vec![
            make_field(
                FieldType::Text,
                field("name", "Full Name")
                    .required(true)
                    .placeholder("Enter your full name"),
            ),
            make_field(
                FieldType::Email,
                field("email", "Email Address")
                    .required(true)
                    .placeholder("Enter your email")
                    .width("50%"),
            ),
            make_field(
                FieldType::Tel,
                field("phone", "Phone Number")
                    .placeholder("Enter your phone number")
                    .width("50%"),
            ),
            make_field(
                FieldType::Select,
                field("subject", "Subject")
                    .required(true)
                    .placeholder("Choose a subject")
                    .options(["General Inquiry", "Support", "Sales", "Feedback"]),
            ),
            make_field(
                FieldType::Textarea,
                field("message", "Message")
                    .required(true)
                    .placeholder("Enter your message"),
            ),
        ],
    )
}

fn survey() -> FormDocument {
    doc(
        "Customer Survey",
        "Help us improve our services",
        vec![
            make_field(
                FieldType::Radio,
                field("satisfaction", "How satisfied are you with our service?")
                    .required(true)
                    .options([
                        "Very Satisfied",
                        "Satisfied",
                        "Neutral",
                        "Dissatisfied",
                        "Very Dissatisfied",
                    ]),
            ),
            make_field(
                FieldType::Radio,
                field("recommend", "Would you recommend us to a friend?")
                    .required(true)
                    .options(["Yes", "No", "Maybe"]),
            ),
            make_field(
                FieldType::Checkbox,
                field("features", "Which features do you use?")
                    .options(["Online Ordering", "Live Chat", "Mobile App", "Newsletter"]),
            ),
            make_field(
                FieldType::Range,
                field("score", "Overall score (0-10)").width("50%"),
            ),
            make_field(
                FieldType::Textarea,
                field("comments", "Additional Comments")
                    .placeholder("Share your thoughts"),
            ),
        ],
    )
}

fn registration() -> FormDocument {
    doc(
        "Event Registration",
        "Register for our upcoming event",
        vec![
            make_field(
                FieldType::Text,
                field("first_name", "First Name")
                    .required(true)
                    .placeholder("Enter first name")
                    .width("50%"),
            ),
            make_field(
                FieldType::Text,
                field("last_name", "Last Name")
                    .required(true)
                    .placeholder("Enter last name")
                    .width("50%"),
            ),
            make_field(
                FieldType::Email,
                field("email", "Email")
                    .required(true)
                    .placeholder("Enter email address"),
            ),
            make_field(
                FieldType::Password,
                field("password", "Password")
                    .required(true)
                    .placeholder("Choose a password")
                    .width("50%"),
            ),
            make_field(
                FieldType::Date,
                field("birth_date", "Date of Birth")
                    .placeholder("Select date")
                    .width("50%"),
            ),
            make_field(
                FieldType::Select,
                field("ticket", "Ticket Type")
                    .required(true)
                    .options(["Standard", "VIP", "Student"]),
            ),
            make_field(
                FieldType::Checkbox,
                field("terms", "Terms")
                    .required(true)
                    .options(["I agree to the terms and conditions"]),
            ),
        ],
    )
}

/// Long-form individual income tax return
fn tax_return() -> FormDocument {
    let text = |id: &str, label: &str, required: bool, width: &str| {
        make_field(
            FieldType::Text,
            field(id, label)
                .required(required)
                .placeholder(format!("Enter {}", label.to_lowercase()))
                .width(width),
        )
    };
    let amount = |id: &str, label: &str| {
        make_field(
            FieldType::Number,
            field(id, label)
                .placeholder("0.00")
                .width("33%"),
        )
    };

    doc(
        "Individual Income Tax Return",
        "Annual income tax return for individual filers",
        vec![
            heading("taxpayer_heading", "Taxpayer Information"),
            text("first_name", "First name and middle initial", true, "33%"),
            text("last_name", "Last name", true, "33%"),
            text("ssn", "Social security number", true, "33%"),
            text("spouse_first_name", "Spouse's first name and middle initial", false, "33%"),
            text("spouse_last_name", "Spouse's last name", false, "33%"),
            text("spouse_ssn", "Spouse's social security number", false, "33%"),
            text("street", "Home address (number and street)", true, "50%"),
            text("apartment", "Apartment no.", false, "25%"),
            text("zip", "ZIP code", true, "25%"),
            text("city", "City, town, or post office", true, "50%"),
            text("state", "State", true, "50%"),
            make_field(
                FieldType::Tel,
                field("phone", "Phone number")
                    .placeholder("Enter phone number")
                    .width("50%"),
            ),
            make_field(
                FieldType::Email,
                field("email", "Email address")
                    .placeholder("Enter email address")
                    .width("50%"),
            ),
            separator("sep_status"),
            heading("status_heading", "Filing Status"),
            make_field(
                FieldType::Radio,
                field("filing_status", "Filing status")
                    .required(true)
                    .options([
                        "Single",
                        "Married filing jointly",
                        "Married filing separately",
                        "Head of household",
                        "Qualifying surviving spouse",
                    ]),
            ),
            make_field(
                FieldType::Checkbox,
                field("campaign_fund", "Presidential Election Campaign")
                    .options(["You", "Spouse"]),
            ),
            separator("sep_dependents"),
            heading("dependents_heading", "Dependents"),
            text("dependent_1_name", "Dependent 1 name", false, "33%"),
            text("dependent_1_ssn", "Dependent 1 SSN", false, "33%"),
            text("dependent_1_relationship", "Dependent 1 relationship", false, "33%"),
            text("dependent_2_name", "Dependent 2 name", false, "33%"),
            text("dependent_2_ssn", "Dependent 2 SSN", false, "33%"),
            text("dependent_2_relationship", "Dependent 2 relationship", false, "33%"),
            separator("sep_income"),
            heading("income_heading", "Income"),
            amount("wages", "Wages, salaries, tips"),
            amount("tax_exempt_interest", "Tax-exempt interest"),
            amount("taxable_interest", "Taxable interest"),
            amount("qualified_dividends", "Qualified dividends"),
            amount("ordinary_dividends", "Ordinary dividends"),
            amount("ira_distributions", "IRA distributions"),
            amount("pensions", "Pensions and annuities"),
            amount("social_security", "Social security benefits"),
            amount("capital_gain", "Capital gain or (loss)"),
            amount("other_income", "Other income"),
            amount("total_income", "Total income"),
            separator("sep_deductions"),
            heading("deductions_heading", "Deductions and Tax"),
            amount("adjustments", "Adjustments to income"),
            amount("agi", "Adjusted gross income"),
            amount("standard_deduction", "Standard or itemized deduction"),
            amount("taxable_income", "Taxable income"),
            amount("tax", "Tax"),
            amount("credits", "Child tax credit and other credits"),
            amount("total_tax", "Total tax"),
            amount("withholding", "Federal income tax withheld"),
            amount("estimated_payments", "Estimated tax payments"),
            separator("sep_refund"),
            heading("refund_heading", "Refund or Amount Owed"),
            amount("overpaid", "Amount overpaid"),
            amount("refund", "Amount refunded to you"),
            amount("amount_owed", "Amount you owe"),
            text("routing_number", "Routing number", false, "50%"),
            text("account_number", "Account number", false, "50%"),
            make_field(
                FieldType::Radio,
                field("account_type", "Account type").options(["Checking", "Savings"]),
            ),
            separator("sep_sign"),
            heading("sign_heading", "Sign Here"),
            text("signature", "Your signature", true, "50%"),
            make_field(
                FieldType::Date,
                field("sign_date", "Date")
                    .required(true)
                    .placeholder("Select date")
                    .width("25%"),
            ),
            text("occupation", "Your occupation", false, "25%"),
            text("spouse_signature", "Spouse's signature", false, "50%"),
            text("spouse_occupation", "Spouse's occupation", false, "50%"),
            make_field(
                FieldType::Pdf,
                field("supporting_documents", "Supporting documents (W-2, 1099)")
                    .placeholder("Upload PDF"),
            ),
        ],
    )
}
