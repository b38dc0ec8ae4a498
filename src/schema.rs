//! Column names of the insurance customer record

/// Row identifier, dropped before modeling
pub const ID: &str = "id";
pub const GENDER: &str = "Gender";
pub const AGE: &str = "Age";
pub const DRIVING_LICENSE: &str = "Driving_License";
pub const REGION_CODE: &str = "Region_Code";
pub const PREVIOUSLY_INSURED: &str = "Previously_Insured";
pub const VEHICLE_AGE: &str = "Vehicle_Age";
pub const VEHICLE_DAMAGE: &str = "Vehicle_Damage";
pub const ANNUAL_PREMIUM: &str = "Annual_Premium";
pub const POLICY_SALES_CHANNEL: &str = "Policy_Sales_Channel";
pub const VINTAGE: &str = "Vintage";
/// Binary label, optional at inference
pub const RESPONSE: &str = "Response";

/// Derived bucket columns
pub const AGE_GROUP: &str = "Age_Group";
pub const PREMIUM_GROUP: &str = "Premium_Group";

/// Columns every ingested file must carry
pub const REQUIRED_COLUMNS: [&str; 11] = [
    ID,
    GENDER,
    AGE,
    DRIVING_LICENSE,
    REGION_CODE,
    PREVIOUSLY_INSURED,
    VEHICLE_AGE,
    VEHICLE_DAMAGE,
    ANNUAL_PREMIUM,
    POLICY_SALES_CHANNEL,
    VINTAGE,
];

/// Columns whose numeric value may arrive embedded in a string
pub const CODE_COLUMNS: [&str; 2] = [REGION_CODE, POLICY_SALES_CHANNEL];

/// Value written into an absent optional label column
pub const MISSING_LABEL: i64 = -1;
