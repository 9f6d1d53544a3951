// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Effective permission resolution for a member on a guild channel.
//!
//! Follows the platform's documented order: guild owner and `ADMINISTRATOR`
//! short-circuit to everything; otherwise the `@everyone` overwrite is applied
//! first, then the union of the member's role overwrites (deny before allow),
//! then the member's own overwrite.

use serenity::all::{PermissionOverwrite, PermissionOverwriteType, Permissions};

use crate::error::StowageError;
use crate::types::{GuildMember, ScopeRoles};

/// Resolves the permissions `member` effectively holds on a channel with `overwrites`.
///
/// Fails if the member carries a role that is absent from `scope` (stale cache).
pub fn effective_permissions(
    scope: &ScopeRoles,
    member: &GuildMember,
    overwrites: &[PermissionOverwrite],
) -> Result<Permissions, StowageError> {
    if member.id == scope.owner_id {
        return Ok(Permissions::all());
    }

    let mut base = scope.role_permissions(scope.everyone)?;
    for role in &member.roles {
        base |= scope.role_permissions(*role)?;
    }

    if base.contains(Permissions::ADMINISTRATOR) {
        return Ok(Permissions::all());
    }

    let mut everyone = None;
    let mut own = None;
    let mut role_allow = Permissions::empty();
    let mut role_deny = Permissions::empty();

    for overwrite in overwrites {
        match overwrite.kind {
            PermissionOverwriteType::Role(id) if id == scope.everyone => everyone = Some(overwrite),
            PermissionOverwriteType::Role(id) if member.roles.contains(&id) => {
                role_allow |= overwrite.allow;
                role_deny |= overwrite.deny;
            }
            PermissionOverwriteType::Member(id) if id == member.id => own = Some(overwrite),
            _ => {}
        }
    }

    let mut perms = base;
    if let Some(ow) = everyone {
        perms = (perms - ow.deny) | ow.allow;
    }
    perms = (perms - role_deny) | role_allow;
    if let Some(ow) = own {
        perms = (perms - ow.deny) | ow.allow;
    }

    Ok(perms)
}

/// Returns whether `member` can see a channel with `overwrites`.
pub fn can_view(
    scope: &ScopeRoles,
    member: &GuildMember,
    overwrites: &[PermissionOverwrite],
) -> Result<bool, StowageError> {
    effective_permissions(scope, member, overwrites)
        .map(|perms| perms.contains(Permissions::VIEW_CHANNEL))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serenity::all::{GuildId, RoleId, UserId};

    use super::*;

    const GUILD: u64 = 1000;
    const OWNER: u64 = 1;
    const MOD_ROLE: u64 = 500;

    fn scope(everyone: Permissions) -> ScopeRoles {
        let mut roles = HashMap::new();
        roles.insert(RoleId::new(GUILD), everyone);
        roles.insert(RoleId::new(MOD_ROLE), Permissions::MANAGE_MESSAGES);
        ScopeRoles::new(GuildId::new(GUILD), UserId::new(OWNER), roles)
    }

    fn member(id: u64, roles: &[u64]) -> GuildMember {
        GuildMember {
            id: UserId::new(id),
            tag: format!("user{id}"),
            bot: false,
            roles: roles.iter().map(|r| RoleId::new(*r)).collect(),
        }
    }

    fn overwrite(kind: PermissionOverwriteType, allow: Permissions, deny: Permissions) -> PermissionOverwrite {
        PermissionOverwrite { allow, deny, kind }
    }

    #[test]
    fn base_role_permissions_apply_without_overwrites() {
        let scope = scope(Permissions::VIEW_CHANNEL);
        assert!(can_view(&scope, &member(2, &[]), &[]).unwrap());
    }

    #[test]
    fn everyone_deny_hides_channel() {
        let scope = scope(Permissions::VIEW_CHANNEL);
        let ows = [overwrite(
            PermissionOverwriteType::Role(RoleId::new(GUILD)),
            Permissions::empty(),
            Permissions::VIEW_CHANNEL,
        )];
        assert!(!can_view(&scope, &member(2, &[]), &ows).unwrap());
    }

    #[test]
    fn role_overwrite_grants_after_everyone_deny() {
        let scope = scope(Permissions::VIEW_CHANNEL);
        let ows = [
            overwrite(
                PermissionOverwriteType::Role(RoleId::new(GUILD)),
                Permissions::empty(),
                Permissions::VIEW_CHANNEL,
            ),
            overwrite(
                PermissionOverwriteType::Role(RoleId::new(MOD_ROLE)),
                Permissions::VIEW_CHANNEL,
                Permissions::empty(),
            ),
        ];
        assert!(can_view(&scope, &member(2, &[MOD_ROLE]), &ows).unwrap());
        assert!(!can_view(&scope, &member(3, &[]), &ows).unwrap());
    }

    #[test]
    fn member_overwrite_wins_over_role_overwrite() {
        let scope = scope(Permissions::empty());
        let ows = [
            overwrite(
                PermissionOverwriteType::Role(RoleId::new(MOD_ROLE)),
                Permissions::VIEW_CHANNEL,
                Permissions::empty(),
            ),
            overwrite(
                PermissionOverwriteType::Member(UserId::new(2)),
                Permissions::empty(),
                Permissions::VIEW_CHANNEL,
            ),
        ];
        assert!(!can_view(&scope, &member(2, &[MOD_ROLE]), &ows).unwrap());
    }

    #[test]
    fn role_allow_beats_role_deny_across_roles() {
        let mut scope = scope(Permissions::empty());
        scope.roles.insert(RoleId::new(501), Permissions::empty());
        let ows = [
            overwrite(
                PermissionOverwriteType::Role(RoleId::new(MOD_ROLE)),
                Permissions::empty(),
                Permissions::VIEW_CHANNEL,
            ),
            overwrite(
                PermissionOverwriteType::Role(RoleId::new(501)),
                Permissions::VIEW_CHANNEL,
                Permissions::empty(),
            ),
        ];
        assert!(can_view(&scope, &member(2, &[MOD_ROLE, 501]), &ows).unwrap());
    }

    #[test]
    fn owner_and_administrator_see_everything() {
        let mut scope = scope(Permissions::empty());
        scope.roles.insert(RoleId::new(600), Permissions::ADMINISTRATOR);
        let ows = [overwrite(
            PermissionOverwriteType::Role(RoleId::new(GUILD)),
            Permissions::empty(),
            Permissions::VIEW_CHANNEL,
        )];
        assert_eq!(
            effective_permissions(&scope, &member(OWNER, &[]), &ows).unwrap(),
            Permissions::all()
        );
        assert!(can_view(&scope, &member(7, &[600]), &ows).unwrap());
    }

    #[test]
    fn unknown_role_fails_evaluation() {
        let scope = scope(Permissions::VIEW_CHANNEL);
        assert!(can_view(&scope, &member(2, &[777]), &[]).is_err());
    }

    #[test]
    fn overwrites_for_other_principals_are_ignored() {
        let scope = scope(Permissions::VIEW_CHANNEL);
        let ows = [
            overwrite(
                PermissionOverwriteType::Member(UserId::new(9)),
                Permissions::empty(),
                Permissions::VIEW_CHANNEL,
            ),
            overwrite(
                PermissionOverwriteType::Role(RoleId::new(MOD_ROLE)),
                Permissions::empty(),
                Permissions::VIEW_CHANNEL,
            ),
        ];
        assert!(can_view(&scope, &member(2, &[]), &ows).unwrap());
    }
}
