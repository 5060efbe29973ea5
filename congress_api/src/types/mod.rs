mod common;
pub use self::common::{BillType, Chamber, Party};

mod bill;
pub use self::bill::{
    BillAction, BillActionSet, BillInfo, BillSearchResultItem, BillSearchResults, BillSummary,
    BillSummarySet, Cosponsor, CosponsorSet, SearchPagination, TextVersion, TextVersionFormat,
    TextVersionSet,
};

mod member;
pub use self::member::{MemberInfo, MemberSearchResults};
