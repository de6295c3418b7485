use recipe_backend_client::UnknownOption;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    Recipe,
    MealPlan,
    Saved,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Recipe, Tab::MealPlan, Tab::Saved];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Recipe => "recipe",
            Tab::MealPlan => "meal-plan",
            Tab::Saved => "saved",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Recipe => "Recipe Generator",
            Tab::MealPlan => "Meal Planner",
            Tab::Saved => "Saved Recipes",
        }
    }
}

impl FromStr for Tab {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str() == s)
            .ok_or_else(|| UnknownOption {
                kind: "tab",
                value: s.to_string(),
            })
    }
}

/// Active view plus the collapsed/expanded state of the mobile menu.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Navigation {
    active_tab: Tab,
    menu_open: bool,
}

impl Navigation {
    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    /// Picking a tab always collapses the menu.
    pub fn select(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.menu_open = false;
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }
}
