use tracing::debug;

use super::context::RequestContext;
use super::gates;
use crate::database::ResourceStore;
use crate::error::ApiError;

/// One predicate check in front of a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    LoggedIn,
    CampgroundAuthor,
    ReviewAuthor,
    ValidCampground,
    ValidReview,
}

pub enum GateOutcome {
    Continue(RequestContext),
    Reject(ApiError),
}

impl Gate {
    pub fn name(&self) -> &'static str {
        match self {
            Gate::LoggedIn => "is_logged_in",
            Gate::CampgroundAuthor => "is_author",
            Gate::ReviewAuthor => "is_review_author",
            Gate::ValidCampground => "validate_campground",
            Gate::ValidReview => "validate_review",
        }
    }

    pub async fn check(self, store: &dyn ResourceStore, ctx: RequestContext) -> GateOutcome {
        let result = match self {
            Gate::LoggedIn => gates::is_logged_in(ctx).await,
            Gate::CampgroundAuthor => gates::is_author(store, ctx).await,
            Gate::ReviewAuthor => gates::is_review_author(store, ctx).await,
            Gate::ValidCampground => gates::validate_campground(ctx).await,
            Gate::ValidReview => gates::validate_review(ctx).await,
        };
        // Faults while checking reject like any other failure
        result.unwrap_or_else(GateOutcome::Reject)
    }
}

/// Ordered gate list for one route. Stops at the first rejection.
#[derive(Debug, Clone, Copy)]
pub struct Chain {
    gates: &'static [Gate],
}

impl Chain {
    pub const fn new(gates: &'static [Gate]) -> Self {
        Self { gates }
    }

    pub fn gates(&self) -> &'static [Gate] {
        self.gates
    }

    pub async fn run(&self, store: &dyn ResourceStore, mut ctx: RequestContext) -> Result<RequestContext, ApiError> {
        for gate in self.gates {
            match gate.check(store, ctx).await {
                GateOutcome::Continue(next) => {
                    debug!("Gate {} passed for {}", gate.name(), next.requested_url);
                    ctx = next;
                }
                GateOutcome::Reject(err) => return Err(err),
            }
        }
        Ok(ctx)
    }
}

pub const CREATE_CAMPGROUND: Chain = Chain::new(&[Gate::LoggedIn, Gate::ValidCampground]);
pub const NEW_CAMPGROUND: Chain = Chain::new(&[Gate::LoggedIn]);
pub const EDIT_CAMPGROUND: Chain = Chain::new(&[Gate::LoggedIn, Gate::CampgroundAuthor]);
pub const UPDATE_CAMPGROUND: Chain = Chain::new(&[Gate::LoggedIn, Gate::CampgroundAuthor, Gate::ValidCampground]);
pub const DELETE_CAMPGROUND: Chain = Chain::new(&[Gate::LoggedIn, Gate::CampgroundAuthor]);
pub const CREATE_REVIEW: Chain = Chain::new(&[Gate::LoggedIn, Gate::ValidReview]);
pub const DELETE_REVIEW: Chain = Chain::new(&[Gate::LoggedIn, Gate::ReviewAuthor]);
