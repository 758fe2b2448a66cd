//! In-memory store fixtures for engine integration tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use clubhaus_core::{GuardianId, MemberId};
use clubhaus_db::{
    GuardianAccount, GuardianLink, MemberRecord, NewGuardianAccount, UpsertGuardianLink,
};
use clubhaus_guardianship::{normalize_email, GuardianshipStore, StoreError};

/// In-memory implementation of [`GuardianshipStore`].
///
/// Mirrors the PostgreSQL semantics the engine relies on: link upserts
/// update in place on a duplicate pair, account creation enforces the
/// unique normalized email, and reads come back in ascending id order.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    guardians: Vec<GuardianAccount>,
    members: Vec<MemberRecord>,
    links: Vec<GuardianLink>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a guardian account with a fixed id.
    ///
    /// Does not enforce email uniqueness, so tests can reproduce the
    /// stale-duplicate-email scenario the resolver tie-breaks on.
    pub fn add_guardian(&self, id: Uuid, name: &str, email: &str) -> GuardianId {
        let mut state = self.state.lock().unwrap();
        state.guardians.push(GuardianAccount {
            id,
            name: name.to_string(),
            email: email.to_string(),
            display_handle: None,
            role: "guardian".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        GuardianId::from_uuid(id)
    }

    /// Seed a member record with a fixed id.
    pub fn add_member(
        &self,
        id: Uuid,
        name: (&str, &str),
        contact_email: Option<&str>,
        contact_name: Option<&str>,
    ) -> MemberId {
        let mut state = self.state.lock().unwrap();
        state.members.push(MemberRecord {
            id,
            first_name: name.0.to_string(),
            last_name: name.1.to_string(),
            guardian_contact_email: contact_email.map(str::to_string),
            guardian_contact_name: contact_name.map(str::to_string),
            guardian_contact_phone: None,
            team_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        MemberId::from_uuid(id)
    }

    /// Current number of guardian accounts.
    pub fn guardian_count(&self) -> usize {
        self.state.lock().unwrap().guardians.len()
    }

    /// Current number of link rows.
    pub fn link_count(&self) -> usize {
        self.state.lock().unwrap().links.len()
    }

    /// The link for a pair, if any.
    pub fn link_for(&self, guardian: GuardianId, member: MemberId) -> Option<GuardianLink> {
        self.state
            .lock()
            .unwrap()
            .links
            .iter()
            .find(|l| l.guardian() == guardian && l.member() == member)
            .cloned()
    }
}

#[async_trait]
impl GuardianshipStore for MemoryStore {
    async fn fetch_guardians(&self) -> Result<Vec<GuardianAccount>, StoreError> {
        let mut rows = self.state.lock().unwrap().guardians.clone();
        rows.sort_by_key(|g| g.id);
        Ok(rows)
    }

    async fn fetch_members(&self) -> Result<Vec<MemberRecord>, StoreError> {
        let mut rows = self.state.lock().unwrap().members.clone();
        rows.sort_by_key(|m| m.id);
        Ok(rows)
    }

    async fn fetch_links(&self) -> Result<Vec<GuardianLink>, StoreError> {
        let mut rows = self.state.lock().unwrap().links.clone();
        rows.sort_by_key(|l| (l.guardian_id, l.member_id));
        Ok(rows)
    }

    async fn guardian_exists(&self, id: GuardianId) -> Result<bool, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .guardians
            .iter()
            .any(|g| g.id == *id.as_uuid()))
    }

    async fn member_exists(&self, id: MemberId) -> Result<bool, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .members
            .iter()
            .any(|m| m.id == *id.as_uuid()))
    }

    async fn find_guardian_by_email(
        &self,
        normalized_email: &str,
    ) -> Result<Option<GuardianAccount>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut matching: Vec<&GuardianAccount> = state
            .guardians
            .iter()
            .filter(|g| normalize_email(&g.email) == normalized_email)
            .collect();
        matching.sort_by_key(|g| g.id);
        Ok(matching.first().map(|g| (*g).clone()))
    }

    async fn members_by_contact_email(
        &self,
        normalized_email: &str,
    ) -> Result<Vec<MemberRecord>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut matching: Vec<MemberRecord> = state
            .members
            .iter()
            .filter(|m| {
                m.guardian_contact_email
                    .as_deref()
                    .map(normalize_email)
                    .as_deref()
                    == Some(normalized_email)
            })
            .cloned()
            .collect();
        matching.sort_by_key(|m| m.id);
        Ok(matching)
    }

    async fn create_guardian(
        &self,
        input: NewGuardianAccount,
    ) -> Result<GuardianAccount, StoreError> {
        let mut state = self.state.lock().unwrap();
        let normalized = normalize_email(&input.email);
        if state
            .guardians
            .iter()
            .any(|g| normalize_email(&g.email) == normalized)
        {
            return Err(StoreError::new(format!(
                "duplicate key value violates unique constraint: {normalized}"
            )));
        }

        let account = GuardianAccount {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            display_handle: input.display_handle,
            role: "guardian".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        state.guardians.push(account.clone());
        Ok(account)
    }

    async fn upsert_link(&self, input: UpsertGuardianLink) -> Result<GuardianLink, StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state
            .links
            .iter_mut()
            .find(|l| l.guardian_id == input.guardian_id && l.member_id == input.member_id)
        {
            existing.relationship_kind = input.relationship_kind;
            existing.can_manage = input.can_manage;
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }

        let link = GuardianLink {
            id: Uuid::new_v4(),
            guardian_id: input.guardian_id,
            member_id: input.member_id,
            relationship_kind: input.relationship_kind,
            can_manage: input.can_manage,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        state.links.push(link.clone());
        Ok(link)
    }

    async fn remove_link(
        &self,
        guardian: GuardianId,
        member: MemberId,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.links.len();
        state
            .links
            .retain(|l| !(l.guardian() == guardian && l.member() == member));
        Ok(state.links.len() < before)
    }
}

/// Fault-injecting wrapper around [`MemoryStore`].
///
/// Lets tests fail reads wholesale (store-unavailable path), fail account
/// creation, or fail link writes for selected members (partial link
/// failure path).
pub struct FaultyStore {
    pub inner: MemoryStore,
    fail_reads: Mutex<bool>,
    fail_create_guardian: Mutex<bool>,
    fail_links_for: Mutex<HashSet<MemberId>>,
}

impl FaultyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_reads: Mutex::new(false),
            fail_create_guardian: Mutex::new(false),
            fail_links_for: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_reads(&self) {
        *self.fail_reads.lock().unwrap() = true;
    }

    pub fn fail_create_guardian(&self) {
        *self.fail_create_guardian.lock().unwrap() = true;
    }

    pub fn fail_links_for(&self, member: MemberId) {
        self.fail_links_for.lock().unwrap().insert(member);
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if *self.fail_reads.lock().unwrap() {
            Err(StoreError::new("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GuardianshipStore for FaultyStore {
    async fn fetch_guardians(&self) -> Result<Vec<GuardianAccount>, StoreError> {
        self.check_reads()?;
        self.inner.fetch_guardians().await
    }

    async fn fetch_members(&self) -> Result<Vec<MemberRecord>, StoreError> {
        self.check_reads()?;
        self.inner.fetch_members().await
    }

    async fn fetch_links(&self) -> Result<Vec<GuardianLink>, StoreError> {
        self.check_reads()?;
        self.inner.fetch_links().await
    }

    async fn guardian_exists(&self, id: GuardianId) -> Result<bool, StoreError> {
        self.check_reads()?;
        self.inner.guardian_exists(id).await
    }

    async fn member_exists(&self, id: MemberId) -> Result<bool, StoreError> {
        self.check_reads()?;
        self.inner.member_exists(id).await
    }

    async fn find_guardian_by_email(
        &self,
        normalized_email: &str,
    ) -> Result<Option<GuardianAccount>, StoreError> {
        self.check_reads()?;
        self.inner.find_guardian_by_email(normalized_email).await
    }

    async fn members_by_contact_email(
        &self,
        normalized_email: &str,
    ) -> Result<Vec<MemberRecord>, StoreError> {
        self.check_reads()?;
        self.inner.members_by_contact_email(normalized_email).await
    }

    async fn create_guardian(
        &self,
        input: NewGuardianAccount,
    ) -> Result<GuardianAccount, StoreError> {
        if *self.fail_create_guardian.lock().unwrap() {
            return Err(StoreError::new("insert failed: disk full"));
        }
        self.inner.create_guardian(input).await
    }

    async fn upsert_link(&self, input: UpsertGuardianLink) -> Result<GuardianLink, StoreError> {
        let member = MemberId::from_uuid(input.member_id);
        if self.fail_links_for.lock().unwrap().contains(&member) {
            return Err(StoreError::new("insert failed: serialization conflict"));
        }
        self.inner.upsert_link(input).await
    }

    async fn remove_link(
        &self,
        guardian: GuardianId,
        member: MemberId,
    ) -> Result<bool, StoreError> {
        self.inner.remove_link(guardian, member).await
    }
}
