pub mod category;
pub mod custom_field;
pub mod dashboard;
pub mod monthly_record;
pub mod transaction;
pub mod user;

pub use category::{Category, NewCategory};
pub use custom_field::{
    CustomFieldDefinition, CustomFieldType, CustomFieldValue, EnrichedCustomField,
    NewCustomFieldDefinition, StoredFieldValue,
};
pub use dashboard::{
    CategoryDetail, DashboardFilter, DetailedData, EnrichedTransaction, MonthlyRecordDetail,
    TransactionsSummary,
};
pub use monthly_record::{MonthlyRecord, NewMonthlyRecord};
pub use transaction::{NewTransaction, Transaction};
pub use user::{NewUser, User};
