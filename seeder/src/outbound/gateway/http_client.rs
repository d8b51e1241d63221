//! Reqwest-backed banking gateway adapter.
//!
//! This adapter owns transport details only: route selection, request
//! serialisation, timeout and HTTP error mapping, and JSON decoding into port
//! identifiers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use seed_data::{
    AccountId, AccountKind, AccountsGateway, CardId, CardKind, CardsGateway, GatewayError,
    MakeOperationRequest, OpenedAccount, OperationId, OperationKind, OperationsGateway, UserId,
    UsersGateway,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    CreateUserRequestDto, CreateUserResponseDto, IssueCardRequestDto, IssueCardResponseDto,
    MakeOperationRequestDto, MakeOperationResponseDto, OpenAccountRequestDto,
    OpenAccountResponseDto,
};

const USERS_ROUTE: &str = "api/v1/users";

/// Gateway adapter that performs JSON POST requests against one base URL.
pub struct GatewayHttpClient {
    client: Client,
    base_url: Url,
}

impl GatewayHttpClient {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// Routes resolve below `base_url`, so a base of `http://host/gateway`
    /// posts users to `http://host/gateway/api/v1/users`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    /// Returns the normalised base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(route)
            .map_err(|error| GatewayError::transport(format!("invalid route {route}: {error}")))
    }

    async fn post<B, R>(&self, route: &str, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(route)?;
        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        debug!(route, status = status.as_u16(), "gateway responded");
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }

        decode(route, bytes.as_ref())
    }
}

#[async_trait]
impl UsersGateway for GatewayHttpClient {
    async fn create_user(&self) -> Result<UserId, GatewayError> {
        let payload = CreateUserRequestDto::fake_with_rng(&mut rand::rng());
        let response: CreateUserResponseDto = self.post(USERS_ROUTE, &payload).await?;
        response.into_domain().map_err(GatewayError::invalid_response)
    }
}

#[async_trait]
impl AccountsGateway for GatewayHttpClient {
    async fn open_account(
        &self,
        kind: AccountKind,
        user_id: &UserId,
    ) -> Result<OpenedAccount, GatewayError> {
        let payload = OpenAccountRequestDto {
            user_id: user_id.as_str(),
        };
        let response: OpenAccountResponseDto = self.post(account_route(kind), &payload).await?;
        response.into_domain().map_err(GatewayError::invalid_response)
    }
}

#[async_trait]
impl CardsGateway for GatewayHttpClient {
    async fn issue_card(
        &self,
        kind: CardKind,
        user_id: &UserId,
        account_id: &AccountId,
    ) -> Result<CardId, GatewayError> {
        let payload = IssueCardRequestDto {
            user_id: user_id.as_str(),
            account_id: account_id.as_str(),
        };
        let response: IssueCardResponseDto = self.post(card_route(kind), &payload).await?;
        response.into_domain().map_err(GatewayError::invalid_response)
    }
}

#[async_trait]
impl OperationsGateway for GatewayHttpClient {
    async fn make_operation(
        &self,
        request: &MakeOperationRequest,
    ) -> Result<OperationId, GatewayError> {
        let payload = MakeOperationRequestDto::from_request(request, &mut rand::rng());
        let response: MakeOperationResponseDto =
            self.post(operation_route(request.kind), &payload).await?;
        response.into_domain().map_err(GatewayError::invalid_response)
    }
}

const fn account_route(kind: AccountKind) -> &'static str {
    match kind {
        AccountKind::Deposit => "api/v1/accounts/open-deposit-account",
        AccountKind::Savings => "api/v1/accounts/open-savings-account",
        AccountKind::DebitCard => "api/v1/accounts/open-debit-card-account",
        AccountKind::CreditCard => "api/v1/accounts/open-credit-card-account",
    }
}

const fn card_route(kind: CardKind) -> &'static str {
    match kind {
        CardKind::Physical => "api/v1/cards/issue-physical-card",
        CardKind::Virtual => "api/v1/cards/issue-virtual-card",
    }
}

const fn operation_route(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::TopUp => "api/v1/operations/make-top-up-operation",
        OperationKind::Purchase => "api/v1/operations/make-purchase-operation",
        OperationKind::Transfer => "api/v1/operations/make-transfer-operation",
        OperationKind::CashWithdrawal => "api/v1/operations/make-cash-withdrawal-operation",
        OperationKind::Fee => "api/v1/operations/make-fee-operation",
        OperationKind::BillPayment => "api/v1/operations/make-bill-payment-operation",
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn decode<R>(route: &str, body: &[u8]) -> Result<R, GatewayError>
where
    R: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|error| {
        GatewayError::decode(format!("invalid JSON payload from {route}: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::timeout(error.to_string())
    } else {
        GatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        status.canonical_reason().unwrap_or("no response body").to_owned()
    } else {
        body_preview
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GatewayError::timeout(format!("status {}: {message}", status.as_u16()))
        }
        _ => GatewayError::status(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network gateway mapping helpers.

    use rstest::rstest;

    use super::*;

    fn client(base: &str) -> GatewayHttpClient {
        let url = Url::parse(base).expect("valid url");
        GatewayHttpClient::new(url, Duration::from_secs(1)).expect("client builds")
    }

    #[rstest]
    #[case::bare_host("http://localhost:8003", "http://localhost:8003/api/v1/users")]
    #[case::trailing_slash("http://localhost:8003/", "http://localhost:8003/api/v1/users")]
    #[case::nested_prefix(
        "http://localhost:8003/gateway",
        "http://localhost:8003/gateway/api/v1/users"
    )]
    fn routes_resolve_below_base_url(#[case] base: &str, #[case] expected: &str) {
        let endpoint = client(base).endpoint(USERS_ROUTE).expect("route joins");

        assert_eq!(endpoint.as_str(), expected);
    }

    #[test]
    fn every_account_kind_has_a_distinct_route() {
        let routes: Vec<&str> = AccountKind::ALL.into_iter().map(account_route).collect();

        assert_eq!(
            routes,
            vec![
                "api/v1/accounts/open-savings-account",
                "api/v1/accounts/open-deposit-account",
                "api/v1/accounts/open-debit-card-account",
                "api/v1/accounts/open-credit-card-account",
            ]
        );
    }

    #[rstest]
    #[case::physical(CardKind::Physical, "api/v1/cards/issue-physical-card")]
    #[case::virtual_card(CardKind::Virtual, "api/v1/cards/issue-virtual-card")]
    fn card_routes_follow_kind(#[case] kind: CardKind, #[case] expected: &str) {
        assert_eq!(card_route(kind), expected);
    }

    #[rstest]
    #[case::top_up(OperationKind::TopUp, "make-top-up-operation")]
    #[case::purchase(OperationKind::Purchase, "make-purchase-operation")]
    #[case::transfer(OperationKind::Transfer, "make-transfer-operation")]
    #[case::cash_withdrawal(OperationKind::CashWithdrawal, "make-cash-withdrawal-operation")]
    #[case::fee(OperationKind::Fee, "make-fee-operation")]
    #[case::bill_payment(OperationKind::BillPayment, "make-bill-payment-operation")]
    fn operation_routes_follow_kind(#[case] kind: OperationKind, #[case] suffix: &str) {
        let route = operation_route(kind);

        assert!(route.starts_with("api/v1/operations/"));
        assert!(route.ends_with(suffix));
    }

    #[rstest]
    #[case::bad_request(StatusCode::BAD_REQUEST, 400)]
    #[case::conflict(StatusCode::CONFLICT, 409)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, 500)]
    fn maps_error_statuses_to_status_errors(#[case] status: StatusCode, #[case] code: u16) {
        let error = map_status_error(status, b"{\"detail\": \"user   not found\"}");

        assert_eq!(
            error,
            GatewayError::status(code, "{\"detail\": \"user not found\"}")
        );
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT)]
    fn maps_timeout_statuses_to_timeouts(#[case] status: StatusCode) {
        let error = map_status_error(status, b"");

        assert!(
            matches!(error, GatewayError::Timeout { .. }),
            "timeout statuses should map to Timeout",
        );
    }

    #[test]
    fn empty_body_falls_back_to_reason_phrase() {
        let error = map_status_error(StatusCode::SERVICE_UNAVAILABLE, b"");

        assert_eq!(error, GatewayError::status(503_u16, "Service Unavailable"));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());

        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn undecodable_bodies_map_to_decode_errors() {
        let result: Result<CreateUserResponseDto, GatewayError> =
            decode(USERS_ROUTE, b"<html>oops</html>");

        assert!(
            matches!(result, Err(GatewayError::Decode { .. })),
            "non-JSON bodies should map to Decode",
        );
    }
}
