//! HTTP request handlers.
//!
//! Role gates run as middleware; store ownership is checked here, against
//! the caller's seller profile.

pub mod admin_handler;
pub mod auth_handler;
pub mod booking_handler;
pub mod health_handler;
pub mod order_handler;
pub mod plan_handler;
pub mod product_handler;
pub mod seller_handler;
pub mod service_handler;
pub mod store_handler;

use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{ItemStatus, Store};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;

/// The store owned by the calling seller.
pub(crate) async fn owned_store(state: &AppState, user: &CurrentUser) -> AppResult<Store> {
    let profile = state.services.sellers().profile(user.id).await?;
    profile.store.ok_or(AppError::NotFound)
}

/// Whether the caller is an admin or the owner of `store_id`.
pub(crate) async fn can_manage_store(
    state: &AppState,
    user: &CurrentUser,
    store_id: Uuid,
) -> AppResult<bool> {
    if user.is_admin() {
        return Ok(true);
    }

    match owned_store(state, user).await {
        Ok(store) => Ok(store.id == store_id),
        Err(AppError::NotFound) => Ok(false),
        Err(e) => Err(e),
    }
}

pub(crate) async fn ensure_store_access(
    state: &AppState,
    user: &CurrentUser,
    store_id: Uuid,
) -> AppResult<()> {
    if can_manage_store(state, user, store_id).await? {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Resolve the store a seller-or-admin request acts on.
///
/// Sellers always act on their own store and may only name that one.
/// Admins must name the store explicitly.
pub(crate) async fn target_store(
    state: &AppState,
    user: &CurrentUser,
    requested: Option<Uuid>,
) -> AppResult<Store> {
    if user.is_admin() {
        let store_id = requested.ok_or_else(|| AppError::validation("storeId is required"))?;
        return state.services.stores().get(store_id).await;
    }

    let store = owned_store(state, user).await?;
    match requested {
        Some(id) if id != store.id => Err(AppError::Forbidden),
        _ => Ok(store),
    }
}

/// Status filter for catalog listings: anonymous callers and other
/// sellers only ever see active items.
pub(crate) async fn visible_status(
    state: &AppState,
    user: Option<&CurrentUser>,
    store_id: Uuid,
    requested: Option<ItemStatus>,
) -> AppResult<Option<ItemStatus>> {
    let privileged = match user {
        Some(user) => can_manage_store(state, user, store_id).await?,
        None => false,
    };

    Ok(if privileged {
        requested
    } else {
        Some(ItemStatus::Active)
    })
}

/// Hide a non-public catalog item from callers who cannot manage its store.
pub(crate) async fn ensure_visible(
    state: &AppState,
    user: Option<&CurrentUser>,
    store_id: Uuid,
    status: ItemStatus,
) -> AppResult<()> {
    if status == ItemStatus::Active {
        return Ok(());
    }

    match user {
        Some(user) if can_manage_store(state, user, store_id).await? => Ok(()),
        _ => Err(AppError::NotFound),
    }
}
