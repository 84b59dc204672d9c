mod issuance;
pub use issuance::PartnerKeyProvider;

mod static_;
pub use static_::StaticPartnerKeyProvider;
