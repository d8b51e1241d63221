//! DTOs for the banking gateway HTTP API.
//!
//! Requests serialise into the gateway's camelCase JSON shape. Responses are
//! decoded into envelope DTOs first, then mapped into port identifiers in one
//! pass so blank identifiers never leak into a seed result.

use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName};
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::EN;
use rand::Rng;
use rand::seq::IndexedRandom;
use seed_data::{
    AccountId, CardId, MakeOperationRequest, OpenedAccount, OperationId, OperationKind, UserId,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MIN_AMOUNT: u32 = 1;
const MAX_AMOUNT: u32 = 1000;

const PURCHASE_CATEGORIES: [&str; 8] = [
    "gas",
    "taxi",
    "tolls",
    "water",
    "beauty",
    "mobile",
    "travel",
    "supermarkets",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateUserRequestDto {
    pub(super) email: String,
    pub(super) last_name: String,
    pub(super) first_name: String,
    pub(super) middle_name: String,
    pub(super) phone_number: String,
}

impl CreateUserRequestDto {
    /// Synthesises a user with fake names and a collision-free email.
    pub(super) fn fake_with_rng<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let email = format!("user.{}@example.com", Uuid::from_u128(rng.random()));
        Self {
            email,
            last_name: LastName(EN).fake_with_rng(rng),
            first_name: FirstName(EN).fake_with_rng(rng),
            middle_name: FirstName(EN).fake_with_rng(rng),
            phone_number: PhoneNumber(EN).fake_with_rng(rng),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OpenAccountRequestDto<'a> {
    pub(super) user_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IssueCardRequestDto<'a> {
    pub(super) user_id: &'a str,
    pub(super) account_id: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(super) enum OperationStatusDto {
    Failed,
    Completed,
    InProgress,
    Unspecified,
}

impl OperationStatusDto {
    const ALL: [Self; 4] = [
        Self::Failed,
        Self::Completed,
        Self::InProgress,
        Self::Unspecified,
    ];
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MakeOperationRequestDto<'a> {
    pub(super) status: OperationStatusDto,
    pub(super) amount: u32,
    pub(super) card_id: &'a str,
    pub(super) account_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) category: Option<&'static str>,
}

impl<'a> MakeOperationRequestDto<'a> {
    /// Fills the fields the port leaves to the adapter with random values.
    ///
    /// A caller-supplied amount is kept as is. Purchases also carry a
    /// spending category.
    pub(super) fn from_request<R>(request: &'a MakeOperationRequest, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let status = OperationStatusDto::ALL
            .choose(rng)
            .copied()
            .unwrap_or(OperationStatusDto::Completed);
        let amount = request
            .amount
            .unwrap_or_else(|| rng.random_range(MIN_AMOUNT..=MAX_AMOUNT));
        let category = match request.kind {
            OperationKind::Purchase => PURCHASE_CATEGORIES.choose(rng).copied(),
            _ => None,
        };

        Self {
            status,
            amount,
            card_id: request.card_id.as_str(),
            account_id: request.account_id.as_str(),
            category,
        }
    }
}

/// Identifier as returned by the gateway: services disagree on string or
/// numeric ids.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawIdDto {
    Text(String),
    Number(u64),
}

impl RawIdDto {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct EntityDto {
    pub(super) id: RawIdDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateUserResponseDto {
    pub(super) user: EntityDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct AccountDto {
    pub(super) id: RawIdDto,
    #[serde(default)]
    pub(super) cards: Vec<EntityDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenAccountResponseDto {
    pub(super) account: AccountDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct IssueCardResponseDto {
    pub(super) card: EntityDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct MakeOperationResponseDto {
    pub(super) operation: EntityDto,
}

impl CreateUserResponseDto {
    pub(super) fn into_domain(self) -> Result<UserId, String> {
        UserId::new(self.user.id.into_string()).map_err(|error| error.to_string())
    }
}

impl OpenAccountResponseDto {
    /// Maps the account and its first card, if the gateway issued one.
    pub(super) fn into_domain(self) -> Result<OpenedAccount, String> {
        let account_id =
            AccountId::new(self.account.id.into_string()).map_err(|error| error.to_string())?;
        let default_card_id = self
            .account
            .cards
            .into_iter()
            .next()
            .map(|card| CardId::new(card.id.into_string()))
            .transpose()
            .map_err(|error| error.to_string())?;

        Ok(OpenedAccount {
            account_id,
            default_card_id,
        })
    }
}

impl IssueCardResponseDto {
    pub(super) fn into_domain(self) -> Result<CardId, String> {
        CardId::new(self.card.id.into_string()).map_err(|error| error.to_string())
    }
}

impl MakeOperationResponseDto {
    pub(super) fn into_domain(self) -> Result<OperationId, String> {
        OperationId::new(self.operation.id.into_string()).map_err(|error| error.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Mapping coverage for gateway DTOs.

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use super::*;

    fn operation(kind: OperationKind, amount: Option<u32>) -> MakeOperationRequest {
        MakeOperationRequest {
            amount,
            ..MakeOperationRequest::new(
                kind,
                CardId::new("card-1").expect("valid id"),
                AccountId::new("account-1").expect("valid id"),
            )
        }
    }

    #[test]
    fn user_payload_serialises_in_camel_case() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let payload = CreateUserRequestDto::fake_with_rng(&mut rng);
        let json = serde_json::to_value(&payload).expect("payload serialises");

        for key in ["email", "lastName", "firstName", "middleName", "phoneNumber"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(payload.email.starts_with("user."));
        assert!(payload.email.ends_with("@example.com"));
    }

    #[test]
    fn user_emails_differ_between_payloads() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let first = CreateUserRequestDto::fake_with_rng(&mut rng);
        let second = CreateUserRequestDto::fake_with_rng(&mut rng);

        assert_ne!(first.email, second.email);
    }

    #[test]
    fn purchase_payload_carries_category() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let request = operation(OperationKind::Purchase, Some(42));
        let payload = MakeOperationRequestDto::from_request(&request, &mut rng);
        let json = serde_json::to_value(&payload).expect("payload serialises");

        assert_eq!(json["amount"], 42);
        assert_eq!(json["cardId"], "card-1");
        assert_eq!(json["accountId"], "account-1");
        let category = json["category"].as_str().expect("category present");
        assert!(PURCHASE_CATEGORIES.contains(&category));
    }

    #[rstest]
    #[case::top_up(OperationKind::TopUp)]
    #[case::transfer(OperationKind::Transfer)]
    #[case::cash_withdrawal(OperationKind::CashWithdrawal)]
    #[case::fee(OperationKind::Fee)]
    #[case::bill_payment(OperationKind::BillPayment)]
    fn non_purchase_payloads_omit_category(#[case] kind: OperationKind) {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let request = operation(kind, None);
        let payload = MakeOperationRequestDto::from_request(&request, &mut rng);
        let json = serde_json::to_value(&payload).expect("payload serialises");

        assert!(json.get("category").is_none());
        assert!((MIN_AMOUNT..=MAX_AMOUNT).contains(&payload.amount));
        let status = json["status"].as_str().expect("status present");
        assert!(["FAILED", "COMPLETED", "IN_PROGRESS", "UNSPECIFIED"].contains(&status));
    }

    #[test]
    fn account_response_maps_first_card_as_default() {
        let body = r#"{"account": {"id": "acc-1", "cards": [{"id": "card-9"}, {"id": "card-10"}]}}"#;
        let decoded: OpenAccountResponseDto = serde_json::from_str(body).expect("decodes");
        let opened = decoded.into_domain().expect("maps");

        assert_eq!(opened.account_id.as_str(), "acc-1");
        assert_eq!(
            opened.default_card_id.as_ref().map(CardId::as_str),
            Some("card-9")
        );
    }

    #[test]
    fn account_response_without_cards_has_no_default() {
        let body = r#"{"account": {"id": 17}}"#;
        let decoded: OpenAccountResponseDto = serde_json::from_str(body).expect("decodes");
        let opened = decoded.into_domain().expect("maps");

        assert_eq!(opened.account_id.as_str(), "17");
        assert!(opened.default_card_id.is_none());
    }

    #[test]
    fn blank_identifiers_are_rejected() {
        let decoded: CreateUserResponseDto =
            serde_json::from_str(r#"{"user": {"id": "  "}}"#).expect("decodes");

        assert!(decoded.into_domain().is_err());
    }
}
