pub mod categories;
pub mod company;
pub mod deal;
pub mod investment_thesis;

pub use categories::*;

pub use company::Entity as Company;
pub use deal::Entity as Deal;
pub use investment_thesis::Entity as InvestmentThesis;
