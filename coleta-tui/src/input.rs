use coleta_core::{CategoryId, Intent};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Focus, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Toggle a category and re-run the point query
    ToggleCategory(CategoryId),
    /// Hand an intent to the native adapter
    Dispatch(Intent),
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Enter, Esc, Left};

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q') && key.modifiers.is_empty() {
        return Action::Quit;
    }

    match app.screen {
        Screen::Points => {
            // The permission notice blocks the screen until dismissed.
            if app.discovery.view().notice.is_some() {
                if matches!(key.code, Enter | Esc | Char(' ')) {
                    app.discovery.dismiss_notice();
                }
                return Action::None;
            }
            handle_points_key(key.code, app)
        }

        Screen::Detail => match key.code {
            Left | Esc | Backspace | Char('b') => Action::Dispatch(app.detail.back()),
            Char('e') => app
                .detail
                .compose_email(&app.contact.email_subject)
                .map_or(Action::None, Action::Dispatch),
            Char('w') => app
                .detail
                .compose_message(&app.contact.message_text)
                .map_or(Action::None, Action::Dispatch),
            _ => Action::None,
        },
    }
}

fn handle_points_key(code: KeyCode, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    match (app.focus, code) {
        (_, Tab) => {
            app.focus = match app.focus {
                Focus::Categories => Focus::Map,
                Focus::Map => Focus::Categories,
            };
            Action::None
        }
        (_, Esc | Backspace) => Action::Dispatch(app.discovery.back()),

        (Focus::Categories, Left | Char('h')) => {
            app.category_index = app.category_index.saturating_sub(1);
            Action::None
        }
        (Focus::Categories, Right | Char('l')) => {
            if app.category_index + 1 < app.discovery.view().categories.len() {
                app.category_index += 1;
            }
            Action::None
        }
        (Focus::Categories, Enter | Char(' ')) => app
            .current_category()
            .map_or(Action::None, Action::ToggleCategory),

        (Focus::Map, Up | Char('k')) => {
            app.marker_index = app.marker_index.saturating_sub(1);
            Action::None
        }
        (Focus::Map, Down | Char('j')) => {
            let markers = app
                .discovery
                .view()
                .map
                .map_or(0, |map| map.markers.len());
            if app.marker_index + 1 < markers {
                app.marker_index += 1;
            }
            Action::None
        }
        (Focus::Map, Enter | Right) => app
            .current_marker()
            .map_or(Action::None, |id| Action::Dispatch(app.discovery.open_detail(id))),

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use coleta_core::{
        Category, CollectionPoint, Coordinate, DiscoveryStart, LocationState, PointId, Route,
    };

    use super::*;
    use crate::config::Config;
    use crate::tasks::Update;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_categories() -> (App, DiscoveryStart) {
        let mut app = App::new(&Config::default());
        let start = app.discovery.activate();
        app.apply(Update::Categories {
            session: start.session,
            result: Ok(vec![
                Category {
                    id: CategoryId(1),
                    title: "Lamps".to_owned(),
                    image_url: String::new(),
                },
                Category {
                    id: CategoryId(2),
                    title: "Batteries".to_owned(),
                    image_url: String::new(),
                },
            ]),
        });
        (app, start)
    }

    #[test]
    fn space_toggles_highlighted_category() {
        let (mut app, _start) = app_with_categories();
        assert_eq!(
            handle_key_event(press(KeyCode::Right), &mut app),
            Action::None
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char(' ')), &mut app),
            Action::ToggleCategory(CategoryId(2))
        );
    }

    #[test]
    fn notice_swallows_keys_until_dismissed() {
        let (mut app, start) = app_with_categories();
        app.apply(Update::Location {
            session: start.session,
            state: LocationState::PermissionDenied,
        });

        assert_eq!(
            handle_key_event(press(KeyCode::Right), &mut app),
            Action::None
        );
        assert_eq!(app.category_index, 0);
        handle_key_event(press(KeyCode::Enter), &mut app);
        assert!(app.discovery.view().notice.is_none());
    }

    #[test]
    fn enter_on_marker_opens_detail() {
        let (mut app, start) = app_with_categories();
        app.apply(Update::Location {
            session: start.session,
            state: LocationState::Resolved(Coordinate::new(0.0, 0.0)),
        });
        app.apply(Update::Points {
            ticket: start.points.ticket,
            result: Ok(vec![CollectionPoint {
                id: PointId(42),
                name: "Mercado".to_owned(),
                image_url: String::new(),
                position: Coordinate::new(0.0, 0.0),
            }]),
        });

        handle_key_event(press(KeyCode::Tab), &mut app);
        assert_eq!(
            handle_key_event(press(KeyCode::Enter), &mut app),
            Action::Dispatch(Intent::Navigate(Route::Detail { id: PointId(42) }))
        );
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let (mut app, _start) = app_with_categories();
        app.screen = Screen::Detail;
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(key, &mut app), Action::Quit);
    }

    #[test]
    fn contact_keys_need_a_loaded_point() {
        let (mut app, _start) = app_with_categories();
        app.screen = Screen::Detail;
        assert_eq!(
            handle_key_event(press(KeyCode::Char('e')), &mut app),
            Action::None
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Esc), &mut app),
            Action::Dispatch(Intent::Navigate(Route::Points))
        );
    }
}
