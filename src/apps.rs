use kuchiki::NodeRef;

use crate::dom;
use crate::model::App;
use crate::render;

pub const APPS_PATH: &str = "data/apps.json";
pub const APP_ID_ATTR: &str = "data-app";

pub fn insert_apps(container: &NodeRef, apps: &[App], base: &str) -> usize {
    let mut inserted = 0;
    for app in apps {
        if dom::find_by_attr(container, APP_ID_ATTR, &app.id).is_some() {
            continue;
        }
        dom::append_html(container, &render::app_card(app, base).into_string());
        inserted += 1;
    }
    inserted
}
