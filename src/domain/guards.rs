//! Pre-transition predicates over entity snapshots.
//!
//! Each guard is a pure function of what the caller already fetched; none of
//! them touch the store. The lifecycle engine calls these before emitting
//! effects, and handlers may call them directly to decide what to render.

use uuid::Uuid;

use crate::models::{bookings, contracts, quotes, requests};

/// A request with at least one live (non-rejected) quote is locked: core
/// fields can only change after every quote is rejected.
pub fn can_edit(request: &requests::Model, quotes: &[quotes::Model]) -> bool {
    request.status == requests::Status::Open && !quotes.iter().any(|q| q.status.is_live())
}

/// Whether `quote` may be accepted on `request`.
///
/// False if the request is not open, the quote is terminal, any sibling is
/// already accepted, or a non-terminal contract exists for the request —
/// regardless of which quote that contract targets. (An unsigned draft for
/// another quote does not pass this guard either; the engine handles that
/// case separately by replacing the draft.)
pub fn can_accept_quote(
    request: &requests::Model,
    quote: &quotes::Model,
    siblings: &[quotes::Model],
    existing_contract: Option<&contracts::Model>,
) -> bool {
    request.status == requests::Status::Open
        && !request.halted
        && matches!(
            quote.status,
            quotes::Status::Pending | quotes::Status::Negotiating
        )
        && !siblings
            .iter()
            .any(|q| q.id != quote.id && q.status == quotes::Status::Accepted)
        && existing_contract.is_none_or(|c| c.status.is_terminal())
}

/// Deletion is gated to open requests with no live contract.
pub fn can_delete(request: &requests::Model, existing_contract: Option<&contracts::Model>) -> bool {
    request.status == requests::Status::Open
        && existing_contract.is_none_or(|c| c.status.is_terminal())
}

/// A seller may quote an open request they don't own, once.
pub fn can_submit_quote(
    request: &requests::Model,
    seller_id: Uuid,
    existing_quotes: &[quotes::Model],
) -> bool {
    request.status == requests::Status::Open
        && !request.halted
        && request.buyer_id != seller_id
        && !existing_quotes
            .iter()
            .any(|q| q.seller_id == seller_id && q.status.is_live())
}

/// Whether `user_id` is a party to the contract.
pub fn is_contract_party(contract: &contracts::Model, user_id: Uuid) -> bool {
    contract.buyer_id == user_id || contract.seller_id == user_id
}

/// Whether `user_id` is a party to the booking.
pub fn is_booking_party(booking: &bookings::Model, user_id: Uuid) -> bool {
    booking.buyer_id == user_id || booking.seller_id == user_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{contract_fixture, quote_fixture, request_fixture};
    use crate::models::contracts::Status as ContractStatus;
    use crate::models::quotes::Status as QuoteStatus;
    use crate::models::requests::Status as RequestStatus;

    #[test]
    fn edit_is_blocked_by_any_live_quote() {
        let request = request_fixture(RequestStatus::Open);
        let pending = quote_fixture(request.id, QuoteStatus::Pending);
        assert!(!can_edit(&request, std::slice::from_ref(&pending)));

        let mut rejected = pending;
        rejected.status = QuoteStatus::Rejected;
        assert!(can_edit(&request, &[rejected]));
    }

    #[test]
    fn accept_is_blocked_by_accepted_sibling() {
        let request = request_fixture(RequestStatus::Open);
        let quote = quote_fixture(request.id, QuoteStatus::Pending);
        let mut sibling = quote_fixture(request.id, QuoteStatus::Accepted);
        sibling.id = uuid::Uuid::new_v4();

        assert!(!can_accept_quote(
            &request,
            &quote,
            &[quote.clone(), sibling],
            None
        ));
    }

    #[test]
    fn accept_is_blocked_by_non_terminal_contract() {
        let request = request_fixture(RequestStatus::Open);
        let quote = quote_fixture(request.id, QuoteStatus::Pending);
        let contract = contract_fixture(request.buyer_id, quote.seller_id, ContractStatus::PendingSeller);

        assert!(!can_accept_quote(&request, &quote, &[quote.clone()], Some(&contract)));

        let mut terminated = contract;
        terminated.status = ContractStatus::Terminated;
        assert!(can_accept_quote(&request, &quote, &[quote.clone()], Some(&terminated)));
    }

    #[test]
    fn delete_requires_open_and_no_live_contract() {
        let mut request = request_fixture(RequestStatus::Open);
        assert!(can_delete(&request, None));

        request.status = RequestStatus::InProgress;
        assert!(!can_delete(&request, None));
    }
}
