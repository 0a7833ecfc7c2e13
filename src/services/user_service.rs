use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::users::{AddressInput, UpdateProfileRequest, VendorProfileRequest},
    entity::users::{ActiveModel as UserActive, AddressBook, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_role},
    models::{Address, User, UserRole, VendorProfile},
    state::AppState,
};

pub fn address_from_input(input: AddressInput) -> Address {
    Address {
        id: Uuid::new_v4(),
        street: input.street,
        city: input.city,
        state: input.state,
        postal_code: input.postal_code,
        country: input.country,
        is_default: input.is_default,
    }
}

/// Add `address` to `book`. The first address, or one flagged default,
/// becomes the only default.
pub fn push_address(book: &mut Vec<Address>, mut address: Address) {
    if book.is_empty() {
        address.is_default = true;
    }
    if address.is_default {
        for existing in book.iter_mut() {
            existing.is_default = false;
        }
    }
    book.push(address);
}

/// Remove an address by id. When the default goes, the first remaining
/// address takes its place.
pub fn drop_address(book: &mut Vec<Address>, address_id: Uuid) -> Option<Address> {
    let idx = book.iter().position(|a| a.id == address_id)?;
    let removed = book.remove(idx);
    if removed.is_default {
        if let Some(first) = book.first_mut() {
            first.is_default = true;
        }
    }
    Some(removed)
}

pub async fn get_me(state: &AppState, user: &AuthUser) -> AppResult<User> {
    Ok(User::from(load(state, user.user_id).await?))
}

pub async fn update_me(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<User> {
    payload.validate()?;
    let existing = load(state, user.user_id).await?;

    let mut active: UserActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;
    Ok(User::from(updated))
}

pub async fn add_address(
    state: &AppState,
    user: &AuthUser,
    payload: AddressInput,
) -> AppResult<User> {
    payload.validate()?;
    let existing = load(state, user.user_id).await?;

    let mut book = existing.addresses.0.clone();
    push_address(&mut book, address_from_input(payload));
    save_addresses(state, existing, book).await
}

pub async fn remove_address(
    state: &AppState,
    user: &AuthUser,
    address_id: Uuid,
) -> AppResult<User> {
    let existing = load(state, user.user_id).await?;

    let mut book = existing.addresses.0.clone();
    drop_address(&mut book, address_id).ok_or_else(|| AppError::not_found("Address"))?;
    save_addresses(state, existing, book).await
}

pub async fn upsert_vendor_profile(
    state: &AppState,
    user: &AuthUser,
    payload: VendorProfileRequest,
) -> AppResult<User> {
    ensure_role(user, &[UserRole::Vendor])?;
    payload.validate()?;
    let existing = load(state, user.user_id).await?;

    let mut active: UserActive = existing.into();
    active.vendor_profile = Set(Some(VendorProfile {
        store_name: payload.store_name,
        description: payload.description,
        website: payload.website,
    }));
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;
    Ok(User::from(updated))
}

async fn load(state: &AppState, user_id: Uuid) -> AppResult<UserModel> {
    Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("User"))
}

async fn save_addresses(
    state: &AppState,
    existing: UserModel,
    book: Vec<Address>,
) -> AppResult<User> {
    let mut active: UserActive = existing.into();
    active.addresses = Set(AddressBook(book));
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;
    Ok(User::from(updated))
}
