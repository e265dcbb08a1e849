//! Letter record - the full set of values describing one letter

use crate::image_ref::ImageRef;
use chrono::NaiveDate;

/// Kinds of contact line shown in the letterhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Phone,
    Email,
    Website,
    Address,
}

impl ContactKind {
    pub const ALL: [ContactKind; 4] = [
        ContactKind::Phone,
        ContactKind::Email,
        ContactKind::Website,
        ContactKind::Address,
    ];

    /// Capitalized label used in the line format.
    pub fn label(&self) -> &'static str {
        match self {
            ContactKind::Phone => "Phone",
            ContactKind::Email => "Email",
            ContactKind::Website => "Website",
            ContactKind::Address => "Address",
        }
    }

    /// Parse an already lower-cased, trimmed kind.
    fn parse(kind: &str) -> Option<Self> {
        match kind {
            "phone" => Some(ContactKind::Phone),
            "email" => Some(ContactKind::Email),
            "website" => Some(ContactKind::Website),
            "address" => Some(ContactKind::Address),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEntry {
    pub kind: ContactKind,
    pub value: String,
}

impl ContactEntry {
    pub fn new(kind: ContactKind, value: impl Into<String>) -> Self {
        Self { kind, value: value.into() }
    }

    pub fn to_line(&self) -> String {
        format!("{}: {}", self.kind.label(), self.value)
    }
}

/// Encode contact entries one per line as `"<Kind>: <value>"`.
pub fn encode_contacts(entries: &[ContactEntry]) -> String {
    entries
        .iter()
        .map(ContactEntry::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse the line format back into entries.
///
/// Each line is split on its first colon. Lines without a colon, with a kind
/// outside [`ContactKind::ALL`], or with an empty value are dropped silently.
pub fn decode_contacts(text: &str) -> Vec<ContactEntry> {
    text.lines()
        .filter_map(|line| {
            let (kind, value) = line.split_once(':')?;
            let kind = ContactKind::parse(&kind.trim().to_lowercase())?;
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            Some(ContactEntry::new(kind, value))
        })
        .collect()
}

/// The three stamp-like fields. Each has a text label and an optional image
/// that takes precedence over the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampSlot {
    /// Approval stamp at the top right of the page.
    TopApproval,
    /// Company seal next to the signature block.
    CompanySeal,
    /// Second approval stamp next to the signature block.
    BottomApproval,
}

impl StampSlot {
    pub const ALL: [StampSlot; 3] = [
        StampSlot::TopApproval,
        StampSlot::BottomApproval,
        StampSlot::CompanySeal,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            StampSlot::TopApproval => "Top Approval Stamp",
            StampSlot::CompanySeal => "Company Stamp/Seal",
            StampSlot::BottomApproval => "Bottom Approval Stamp",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            StampSlot::TopApproval => "e.g., APPROVED",
            StampSlot::CompanySeal => "e.g., SEAL",
            StampSlot::BottomApproval => "e.g., VERIFIED",
        }
    }
}

/// Fields that must be non-empty before a letter can be generated, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Date,
    AttentionTo,
    Letterhead,
    Subhead,
    ContactInfo,
    LetterBody,
    Name,
    Position,
}

impl RequiredField {
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::Date => "Date",
            RequiredField::AttentionTo => "Attention To",
            RequiredField::Letterhead => "Letterhead",
            RequiredField::Subhead => "Subhead",
            RequiredField::ContactInfo => "Contact Information",
            RequiredField::LetterBody => "Letter Body",
            RequiredField::Name => "Name",
            RequiredField::Position => "Position",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LetterRecord {
    pub date: Option<NaiveDate>,
    pub attention_to: String,
    pub letterhead: String,
    pub subhead: String,
    pub logo: Option<ImageRef>,
    pub contact_info: Vec<ContactEntry>,
    pub subject: String,
    pub letter_body: String,
    pub signature_image: Option<ImageRef>,
    pub name: String,
    pub position: String,
    pub stamp: String,
    pub stamp_file: Option<ImageRef>,
    pub approval_stamp: String,
    pub approval_stamp_file: Option<ImageRef>,
    pub bottom_approval_stamp: String,
    pub bottom_approval_stamp_file: Option<ImageRef>,
}

impl LetterRecord {
    /// Template letter shown when the application starts.
    pub fn sample() -> Self {
        Self {
            date: None,
            attention_to: String::new(),
            letterhead: "ZENXO TOTALITY\nTRADING & CONTRACTING CO. L.L.C.".into(),
            subhead: "General Trading, Supply & Contracting".into(),
            logo: None,
            contact_info: vec![
                ContactEntry::new(ContactKind::Phone, "+971 52 344 5460"),
                ContactEntry::new(ContactKind::Email, "o.al-khowaiter@zttcontracting.com"),
                ContactEntry::new(ContactKind::Website, "www.zttcontracting.com"),
                ContactEntry::new(
                    ContactKind::Address,
                    "40th Floor, Ubora Tower, Business Bay, P.O. Box 10162, Dubai, United Arab Emirates",
                ),
            ],
            subject: "RE: SUPPLY CONTRACT INVOICE APPROVAL LETTER".into(),
            letter_body: SAMPLE_BODY.into(),
            signature_image: None,
            name: "MR. AHMAD O. AL-KHOWAITER".into(),
            position: "DUBAI REGIONAL MANAGER".into(),
            stamp: "SEAL".into(),
            stamp_file: None,
            approval_stamp: "APPROVED".into(),
            approval_stamp_file: None,
            bottom_approval_stamp: "VERIFIED".into(),
            bottom_approval_stamp_file: None,
        }
    }

    /// Required fields that are currently empty.
    pub fn missing_required(&self) -> Vec<RequiredField> {
        let checks = [
            (RequiredField::Date, self.date.is_none()),
            (RequiredField::AttentionTo, self.attention_to.is_empty()),
            (RequiredField::Letterhead, self.letterhead.is_empty()),
            (RequiredField::Subhead, self.subhead.is_empty()),
            (RequiredField::ContactInfo, self.contact_info.is_empty()),
            (RequiredField::LetterBody, self.letter_body.is_empty()),
            (RequiredField::Name, self.name.is_empty()),
            (RequiredField::Position, self.position.is_empty()),
        ];
        checks
            .into_iter()
            .filter_map(|(field, missing)| missing.then_some(field))
            .collect()
    }

    /// Text label and optional image of a stamp-like field.
    pub fn stamp(&self, slot: StampSlot) -> (&str, Option<&ImageRef>) {
        match slot {
            StampSlot::TopApproval => (&self.approval_stamp, self.approval_stamp_file.as_ref()),
            StampSlot::CompanySeal => (&self.stamp, self.stamp_file.as_ref()),
            StampSlot::BottomApproval => (
                &self.bottom_approval_stamp,
                self.bottom_approval_stamp_file.as_ref(),
            ),
        }
    }
}

const SAMPLE_BODY: &str = "CONGRATULATIONS!!!

We hereby confirm the acceptance of your submitted proforma invoice for the supply of safety shoes with the specified quantity and details as outlined in the invoice. The total amount of the contract is four million United States Dollars (US$4,000,000).

Your proforma invoice for this supply has been approved after our board of directors' executive meetings. Your company has been selected for this supply contract as one of the best among all the quotations/invoices received from various suppliers. Please review the draft contract agreement before the official signing date following the completion of the approval process.

As per the UAE Supply Contract Act, the supplier must be registered with the National Contracts Approval Council (NCAC) by completing and returning the attached registration form. This registration is necessary for NCAC to grant final approval for the release and transfer of the invoice amount to your company's account without any issues.

Therefore, please submit the following:
  \u{2022} Filled Supplier Approval Registration Form.
  \u{2022} Company Commercial Trade License/Certificate in official English translation.
  \u{2022} Copy of HSE Certificate.
  \u{2022} Copy of QA Certificate for ISO series.

Congratulations once again. We look forward to your prompt response and cooperation.";
