use crate::{
    banner::BANNER_IMAGES,
    navigation::Tab,
    store::{ClientState, Notice, NoticeKind},
};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use recipe_backend_client::{
    CookingTime, DietaryPreference, MAX_SERVINGS, MIN_SERVINGS, MealPlan, MealType, Recipe,
};

const PENDING_REFRESH_SECS: u32 = 2;
const SAVED_PREVIEW_LEN: usize = 3;

/// Renders the whole page for `state`. Pure: same inputs, same HTML.
pub fn render_page(state: &ClientState, banner_index: usize) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    if state.in_flight {
        html.push_str(&format!(
            "<meta http-equiv=\"refresh\" content=\"{}\">\n",
            PENDING_REFRESH_SECS
        ));
    }
    html.push_str("<title>YummyTool</title>\n</head>\n<body>\n");

    render_header(&mut html, state);
    html.push_str("<main>\n");
    render_banner(&mut html, banner_index);
    if let Some(notice) = &state.notice {
        render_notice(&mut html, notice);
    }
    render_form(&mut html, state);

    match state.navigation.active_tab() {
        Tab::Recipe => {
            if let Some(recipe) = &state.recipe {
                render_recipe(&mut html, recipe);
            }
        }
        Tab::MealPlan => {
            if let Some(plan) = &state.meal_plan {
                render_meal_plan(&mut html, plan);
            }
        }
        Tab::Saved => render_saved(&mut html, &state.saved_recipes),
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_header(html: &mut String, state: &ClientState) {
    let nav = &state.navigation;
    html.push_str("<header>\n<h1>YummyTool</h1>\n");
    html.push_str(
        "<form method=\"post\" action=\"/menu\"><button class=\"menu-toggle\" aria-label=\"Menu\">&#9776;</button></form>\n",
    );
    html.push_str(&format!(
        "<nav class=\"{}\">\n",
        if nav.menu_open() { "menu-open" } else { "menu-closed" }
    ));
    for tab in Tab::ALL {
        let class = if tab == nav.active_tab() { "tab active" } else { "tab" };
        html.push_str(&format!(
            "<form method=\"post\" action=\"/tabs/{}\"><button class=\"{}\">{}</button></form>\n",
            tab.as_str(),
            class,
            tab.label()
        ));
    }
    html.push_str("</nav>\n</header>\n");
}

fn render_banner(html: &mut String, banner_index: usize) {
    html.push_str("<section class=\"hero\">\n");
    for (i, src) in BANNER_IMAGES.iter().enumerate() {
        let class = if i == banner_index { "visible" } else { "hidden" };
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"Food bowl\" class=\"{}\">\n",
            attr(src),
            class
        ));
    }
    html.push_str("<h2>AI-Powered Recipe Generation</h2>\n");
    html.push_str("<p>Transform your ingredients into delicious meals</p>\n</section>\n");
}

fn render_notice(html: &mut String, notice: &Notice) {
    let kind = match notice.kind {
        NoticeKind::Validation => "validation",
        NoticeKind::Network => "network",
    };
    html.push_str(&format!(
        "<div role=\"alert\" class=\"notice notice-{}\">\n<p>{}</p>\n",
        kind,
        text(&notice.message)
    ));
    html.push_str(
        "<form method=\"post\" action=\"/notice/dismiss\"><button>OK</button></form>\n</div>\n",
    );
}

fn render_form(html: &mut String, state: &ClientState) {
    let form = &state.form;
    html.push_str("<section class=\"ingredients\">\n<h3>What ingredients do you have?</h3>\n");
    html.push_str(&format!(
        "<form method=\"post\" action=\"/ingredients\">\n<input type=\"text\" name=\"ingredient\" value=\"{}\" placeholder=\"Enter an ingredient...\" autofocus>\n<button>Add Ingredient</button>\n</form>\n",
        attr(form.pending_ingredient())
    ));

    if !form.ingredients().is_empty() {
        html.push_str("<h4>Your Ingredients:</h4>\n<ul class=\"chips\">\n");
        for (index, ingredient) in form.ingredients().iter().enumerate() {
            html.push_str(&format!(
                "<li>{}<form method=\"post\" action=\"/ingredients/{}/remove\"><button aria-label=\"Remove\">&times;</button></form></li>\n",
                text(ingredient.as_str()),
                index
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("<h4>Dietary Preferences:</h4>\n<div class=\"preferences\">\n");
    for pref in DietaryPreference::ALL {
        let class = if form.is_selected(pref) { "pref selected" } else { "pref" };
        html.push_str(&format!(
            "<form method=\"post\" action=\"/preferences/{0}\"><button class=\"{1}\">{0}</button></form>\n",
            pref.as_str(),
            class
        ));
    }
    html.push_str("</div>\n");

    html.push_str("<form method=\"post\" action=\"/options\" class=\"options\">\n");
    html.push_str("<label>Meal Type <select name=\"meal_type\">");
    for meal in MealType::ALL {
        push_option(html, meal.as_str(), meal.label(), meal == form.meal_type());
    }
    html.push_str("</select></label>\n<label>Cooking Time <select name=\"cooking_time\">");
    for time in CookingTime::ALL {
        push_option(html, time.as_str(), time.label(), time == form.cooking_time());
    }
    html.push_str("</select></label>\n");
    html.push_str(&format!(
        "<label>Servings <input type=\"number\" name=\"servings\" value=\"{}\" min=\"{}\" max=\"{}\"></label>\n",
        form.servings(),
        MIN_SERVINGS,
        MAX_SERVINGS
    ));
    html.push_str("<button>Apply</button>\n</form>\n");

    let disabled = if state.can_generate() { "" } else { " disabled" };
    let (recipe_label, plan_label) = if state.in_flight {
        ("Generating Recipe...", "Generating Meal Plan...")
    } else {
        ("Generate Recipe", "Generate 3-Day Meal Plan")
    };
    html.push_str(&format!(
        "<div class=\"actions\">\n<form method=\"post\" action=\"/generate/recipe\"><button{}>{}</button></form>\n<form method=\"post\" action=\"/generate/meal-plan\"><button{}>{}</button></form>\n</div>\n</section>\n",
        disabled, recipe_label, disabled, plan_label
    ));
}

fn push_option(html: &mut String, value: &str, label: &str, selected: bool) {
    html.push_str(&format!(
        "<option value=\"{}\"{}>{}</option>",
        value,
        if selected { " selected" } else { "" },
        label
    ));
}

fn render_recipe(html: &mut String, recipe: &Recipe) {
    html.push_str("<section class=\"result recipe\">\n<h3>Your Generated Recipe</h3>\n");
    html.push_str(&format!("<h4>{}</h4>\n", text(&recipe.title)));
    html.push_str(&format!(
        "<p class=\"badges\"><span>&#9201; {}</span> <span>&#128101; {} servings</span> <span>&#128202; {}</span></p>\n",
        text(&recipe.cooking_time),
        servings_text(recipe),
        text(&recipe.difficulty)
    ));

    html.push_str("<h5>Ingredients:</h5>\n<ul>\n");
    for ingredient in &recipe.ingredients {
        html.push_str(&format!("<li>{}</li>\n", text(ingredient)));
    }
    html.push_str("</ul>\n<h5>Instructions:</h5>\n<ol>\n");
    for instruction in &recipe.instructions {
        html.push_str(&format!("<li>{}</li>\n", text(instruction)));
    }
    html.push_str("</ol>\n");

    if let Some(info) = &recipe.nutritional_info {
        html.push_str("<h5>Nutritional Information:</h5>\n<dl class=\"nutrition\">\n");
        for (nutrient, value) in info.iter() {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            html.push_str(&format!(
                "<dt>{}</dt><dd>{}</dd>\n",
                text(&capitalize(nutrient)),
                text(&value)
            ));
        }
        html.push_str("</dl>\n");
    }
    html.push_str("</section>\n");
}

fn render_meal_plan(html: &mut String, plan: &MealPlan) {
    html.push_str("<section class=\"result meal-plan\">\n<h3>Your 3-Day Meal Plan</h3>\n");
    for day in plan.days() {
        html.push_str(&format!(
            "<article class=\"day\">\n<h4>{}</h4>\n",
            text(&capitalize(&day.label))
        ));
        for (meal_type, meal) in &day.meals {
            html.push_str(&format!(
                "<div class=\"meal\">\n<h5>{}</h5>\n<h6>{}</h6>\n<p>&#9201; {}</p>\n<p><strong>Ingredients:</strong> {}</p>\n</div>\n",
                text(&capitalize(meal_type)),
                text(&meal.title),
                text(&meal.cooking_time),
                text(&meal.ingredients.join(", "))
            ));
        }
        html.push_str("</article>\n");
    }
    html.push_str("</section>\n");
}

fn render_saved(html: &mut String, recipes: &[Recipe]) {
    html.push_str("<section class=\"result saved\">\n<h3>Saved Recipes</h3>\n");
    if recipes.is_empty() {
        html.push_str(
            "<p class=\"empty\">No saved recipes yet. Generate your first recipe to get started!</p>\n</section>\n",
        );
        return;
    }

    html.push_str("<div class=\"cards\">\n");
    for recipe in recipes {
        let preview: Vec<&str> = recipe
            .ingredients
            .iter()
            .take(SAVED_PREVIEW_LEN)
            .map(String::as_str)
            .collect();
        let ellipsis = if recipe.ingredients.len() > SAVED_PREVIEW_LEN {
            "..."
        } else {
            ""
        };
        let id = recipe
            .id
            .as_ref()
            .map(|id| format!(" data-recipe-id=\"{}\"", attr(&id.to_string())))
            .unwrap_or_default();

        html.push_str(&format!("<article class=\"card\"{}>\n", id));
        html.push_str(&format!("<h4>{}</h4>\n", text(&recipe.title)));
        html.push_str(&format!(
            "<p class=\"badges\"><span>&#9201; {}</span> <span>&#128101; {}</span> <span>&#128202; {}</span></p>\n",
            text(&recipe.cooking_time),
            servings_text(recipe),
            text(&recipe.difficulty)
        ));
        html.push_str(&format!(
            "<p>{}{}</p>\n",
            text(&preview.join(", ")),
            ellipsis
        ));
        html.push_str("<ul class=\"tags\">");
        for tag in recipe.dietary_tags.iter().take(SAVED_PREVIEW_LEN) {
            html.push_str(&format!("<li>{}</li>", text(tag)));
        }
        html.push_str("</ul>\n</article>\n");
    }
    html.push_str("</div>\n</section>\n");
}

fn servings_text(recipe: &Recipe) -> String {
    recipe
        .servings
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
