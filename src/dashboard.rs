//! Role-based profile dashboards
//!
//! A dashboard is a sidebar of tabs plus one content panel. Which tabs exist
//! depends on the role; which panel shows depends on the role and the
//! active tab. Panel data is borrowed from the profile the provider handed
//! out; nothing here computes statistics.

use crate::profile::{ChildSummary, Profile, Role};

/// Sidebar entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Profile overview.
    Profile,
    /// Account settings.
    Settings,
    /// Parent: linked children.
    Children,
    /// Parent: reading reports.
    Reports,
    /// Child: progress and badges.
    Progress,
    /// Child: book collection.
    Books,
    /// Author: created books.
    MyBooks,
    /// Author: readership analytics.
    Analytics,
}

impl Tab {
    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            Tab::Profile => "Profile",
            Tab::Settings => "Settings",
            Tab::Children => "Children",
            Tab::Reports => "Reports",
            Tab::Progress => "Progress",
            Tab::Books | Tab::MyBooks => "My Books",
            Tab::Analytics => "Analytics",
        }
    }

    /// Stable identifier, as used in URLs.
    pub fn id(self) -> &'static str {
        match self {
            Tab::Profile => "profile",
            Tab::Settings => "settings",
            Tab::Children => "children",
            Tab::Reports => "reports",
            Tab::Progress => "progress",
            Tab::Books => "books",
            Tab::MyBooks => "mybooks",
            Tab::Analytics => "analytics",
        }
    }
}

/// Tabs offered to `role`, in sidebar order.
pub fn tabs_for(role: Role) -> [Tab; 4] {
    match role {
        Role::Parent => [Tab::Profile, Tab::Settings, Tab::Children, Tab::Reports],
        Role::Child => [Tab::Profile, Tab::Settings, Tab::Progress, Tab::Books],
        Role::Author => [Tab::Profile, Tab::Settings, Tab::MyBooks, Tab::Analytics],
    }
}

/// Swahili page heading for a role.
pub fn heading(role: Role) -> &'static str {
    match role {
        Role::Parent => "Wasifu wa Mzazi",
        Role::Child => "Wasifu wa Mtoto",
        Role::Author => "Wasifu Wangu",
    }
}

/// Swahili subtitle under the heading.
pub fn subtitle(role: Role) -> &'static str {
    match role {
        Role::Parent => "Simamia akaunti yako na maendeleo ya watoto wako",
        Role::Child => "Angalia maendeleo yako na mafanikio",
        Role::Author => "Simamia vitabu vyako na watumiaji wako",
    }
}

/// Whose books a collection panel lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    /// Books the child has read.
    Reading,
    /// Books the author created; offers "Create New Book".
    Created,
}

/// Editable field on the settings panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsField {
    /// Display name.
    Name,
    /// Contact email (not for children).
    Email,
    /// Age (children only).
    Age,
    /// Password change block.
    Password,
    /// Email notification switch (not for children).
    EmailNotifications,
    /// Child activity alerts (parents only).
    ChildActivityAlerts,
}

/// Settings fields shown to `role`.
pub fn settings_fields(role: Role) -> Vec<SettingsField> {
    let mut fields = vec![SettingsField::Name];
    match role {
        Role::Child => fields.push(SettingsField::Age),
        Role::Parent | Role::Author => fields.push(SettingsField::Email),
    }
    fields.push(SettingsField::Password);
    if role != Role::Child {
        fields.push(SettingsField::EmailNotifications);
    }
    if role == Role::Parent {
        fields.push(SettingsField::ChildActivityAlerts);
    }
    fields
}

/// Content area of a dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Panel<'a> {
    /// Role profile overview.
    Profile(&'a Profile),
    /// Parent: manage linked children.
    Children(&'a [ChildSummary]),
    /// Parent: reading reports for linked children.
    Reports(&'a [ChildSummary]),
    /// Child: progress, points, badges.
    Progress(&'a Profile),
    /// Child or author book list.
    Books(Collection),
    /// Settings form.
    Settings(Vec<SettingsField>),
    /// Author analytics (figures come from elsewhere).
    Analytics,
    /// Nothing built for this combination yet.
    UnderDevelopment(Tab),
}

/// Dashboard state for one signed-in user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dashboard {
    profile: Profile,
    active: Tab,
}

impl Dashboard {
    /// Open on the profile tab.
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            active: Tab::Profile,
        }
    }

    /// Role of the signed-in user.
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// Profile backing the panels.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Sidebar tabs.
    pub fn tabs(&self) -> [Tab; 4] {
        tabs_for(self.role())
    }

    /// Active tab.
    pub fn active(&self) -> Tab {
        self.active
    }

    /// Switch tabs. Tabs the role does not offer are refused.
    pub fn select(&mut self, tab: Tab) -> bool {
        if self.tabs().contains(&tab) {
            self.active = tab;
            true
        } else {
            false
        }
    }

    /// Panel for the active tab.
    pub fn panel(&self) -> Panel<'_> {
        match (self.active, &self.profile) {
            (Tab::Profile, profile) => Panel::Profile(profile),
            (Tab::Settings, profile) => Panel::Settings(settings_fields(profile.role())),
            (Tab::Children, Profile::Parent(parent)) => Panel::Children(&parent.children),
            (Tab::Reports, Profile::Parent(parent)) => Panel::Reports(&parent.children),
            (Tab::Progress, Profile::Child(_)) => Panel::Progress(&self.profile),
            (Tab::Books, Profile::Child(_)) => Panel::Books(Collection::Reading),
            (Tab::MyBooks, Profile::Author(_)) => Panel::Books(Collection::Created),
            (Tab::Analytics, Profile::Author(_)) => Panel::Analytics,
            (tab, _) => Panel::UnderDevelopment(tab),
        }
    }
}
