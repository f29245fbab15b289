//! Gantt-style demo: tasks on a timeline, one row per resource.
//!
//! Tasks are interactive items: they can be selected, dragged to another
//! time or resource and resized at either end. A load chart below shares the
//! timeline through an [`AxisLink`] and follows every accepted drop.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Weekday};
use egui::Ui;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rnav::{
    AxisLink, ColorMap, DomainLine, DomainRect, Hue, InteractionHandler, InteractiveItem,
    ItemCapabilities, ItemRuler, ItemVisuals, NavigationConfig, NavigationView, NumberRuler,
    ObjectRole, SizeLimits, Style, ThemeService, TimelineRuler, Variant,
};

pub type ScheduleView = NavigationView<TimelineRuler, ItemRuler>;
pub type LoadView = NavigationView<TimelineRuler, NumberRuler>;

const TASK_NAMES: [&str; 8] = [
    "Design review",
    "Build",
    "Integration",
    "Load test",
    "Deploy",
    "Maintenance window",
    "Backup",
    "Audit",
];

const HUES: [Hue; 5] = [Hue::Blue, Hue::Teal, Hue::Green, Hue::Amber, Hue::Purple];

/// Vertical inset of a bar inside its row.
const BAR_INSET: f64 = 0.2;
const HOUR: f64 = 3600.0;
const LOAD_HEIGHT: f32 = 160.0;

/// One bar of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub row: usize,
    pub name: String,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
}

/// Generates back-to-back tasks with random gaps for `rows` resources,
/// starting at `origin` and ending before `origin + days`.
pub fn generate_tasks(rows: usize, origin: NaiveDateTime, days: i64, seed: u64) -> Vec<Task> {
    let mut rng = StdRng::seed_from_u64(seed);
    let end = origin + TimeDelta::days(days);
    let mut tasks = Vec::new();

    for row in 0..rows {
        let mut t = origin + TimeDelta::hours(rng.gen_range(0..48));
        loop {
            let start = t;
            let stop = start + TimeDelta::hours(rng.gen_range(2..96));
            if stop >= end {
                break;
            }
            tasks.push(Task {
                row,
                name: TASK_NAMES[rng.gen_range(0..TASK_NAMES.len())].to_string(),
                start,
                stop,
            });
            t = stop + TimeDelta::hours(rng.gen_range(1..72));
        }
    }
    tasks
}

/// Number of tasks running on each day from `origin`.
pub fn daily_load(tasks: &[Task], origin: NaiveDateTime, days: usize) -> Vec<u32> {
    let mut load = vec![0; days];
    for task in tasks {
        let first = (task.start - origin).num_days().max(0) as usize;
        let last = ((task.stop - origin).num_days().max(0) as usize).min(days.saturating_sub(1));
        for day in load.iter_mut().take(last + 1).skip(first) {
            *day += 1;
        }
    }
    load
}

fn hue_for_row(row: usize) -> Hue {
    HUES[row % HUES.len()]
}

/// Schedule and load views plus the data they share.
#[derive(Debug)]
pub struct ScheduleDemo {
    pub view: ScheduleView,
    pub load_view: LoadView,
    pub tasks: InteractionHandler<usize>,
    link: AxisLink,
    data: Rc<RefCell<Vec<Task>>>,
    load: Rc<RefCell<Vec<u32>>>,
    origin: NaiveDateTime,
    days: usize,
    milestone: NaiveDateTime,
}

impl ScheduleDemo {
    /// Builds the schedule view over one year of generated tasks.
    pub fn build(config: &NavigationConfig, rows: usize) -> anyhow::Result<Self> {
        let origin = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .context("invalid schedule origin")?;
        let days = 366;
        let stop = origin + TimeDelta::days(days as i64);

        let timeline = TimelineRuler::new(origin, stop)?
            .with_visible_range(origin, origin + TimeDelta::days(30))?;
        let resources = ItemRuler::new(rows)?.with_labels(|i| format!("Resource {}", i + 1));

        let data = generate_tasks(rows, origin, days as i64, 7);
        log::info!("schedule demo with {} tasks", data.len());
        let load = Rc::new(RefCell::new(daily_load(&data, origin, days)));
        let peak = load.borrow().iter().copied().max().unwrap_or(0).max(1);

        let tasks = task_items(&timeline, &resources, &data, rows);
        let view = NavigationView::with_config(timeline.clone(), resources, config.clone());
        let load_axis = NumberRuler::new(0.0, peak as f64 * 1.1)?.with_reverse(true);
        let load_view = NavigationView::with_config(timeline, load_axis, config.clone());

        let mut demo = Self {
            view,
            load_view,
            tasks,
            link: AxisLink::new(),
            data: Rc::new(RefCell::new(data)),
            load,
            origin,
            days,
            milestone: origin + TimeDelta::days(45),
        };
        demo.install_drop_handler();
        demo.register_layers();
        Ok(demo)
    }

    /// Switches the theme and re-registers layers with the new colors.
    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.view.theme_mut().set_dark_mode(dark_mode);
        self.load_view.theme_mut().set_dark_mode(dark_mode);
        self.register_layers();
    }

    pub fn set_config(&mut self, config: NavigationConfig) {
        self.view.set_config(config.clone());
        self.load_view.set_config(config);
    }

    pub fn reset(&mut self) {
        self.view.reset();
        self.link.reset();
        self.sync_views();
    }

    /// Shows the schedule above its load chart.
    pub fn show(&mut self, ui: &mut Ui) {
        let size = ui.available_size();
        let schedule_height = (size.y - LOAD_HEIGHT).max(size.y * 0.5);
        ui.allocate_ui(egui::vec2(size.x, schedule_height), |ui| {
            self.view.show_with(ui, &mut self.tasks);
        });
        self.load_view.show(ui);

        if self.sync_views() {
            ui.ctx().request_repaint();
        }
    }

    /// Keeps both timelines on the same range; returns whether one moved.
    pub fn sync_views(&mut self) -> bool {
        self.view.link_horizontal(&mut self.load_view, &mut self.link)
    }

    /// Writes accepted drops back to the task list and refreshes the load.
    fn install_drop_handler(&mut self) {
        let decoder = self.view.h_axis().clone();
        let rows = self.view.v_axis().item_count();
        let data = Rc::clone(&self.data);
        let load = Rc::clone(&self.load);
        let (origin, days) = (self.origin, self.days);

        self.tasks.set_can_drop(move |items| {
            items
                .iter()
                .all(|item| item.rect.y >= 0.0 && item.rect.bottom() <= rows as f64)
        });
        self.tasks.set_on_drop(move |items| {
            let mut tasks = data.borrow_mut();
            for item in items {
                if let Some(task) = tasks.get_mut(item.data) {
                    let (start, stop) = item.x_range(&decoder);
                    task.start = start;
                    task.stop = stop;
                    task.row = item.rect.y.floor().max(0.0) as usize;
                }
            }
            *load.borrow_mut() = daily_load(&tasks, origin, days);
            log::debug!("moved {} tasks", items.len());
        });
    }

    /// (Re)registers every layer and item style with colors from the
    /// current theme.
    fn register_layers(&mut self) {
        let theme = *self.view.theme();

        self.tasks.set_item_color(move |item| {
            let hue = hue_for_row(item.rect.y as usize);
            Some(theme.saturated_color(hue, Variant::Fill))
        });

        let shade = Style::filled(theme.object_color(ObjectRole::SurfaceSubtle));
        self.view.draw_rects("weekends", shade, |window| {
            weekend_days(window.x.start, window.x.end)
                .map(|day| DomainRect {
                    x0: day,
                    y0: window.y.start,
                    x1: day + TimeDelta::days(1),
                    y1: window.y.end,
                })
                .collect()
        });

        let milestone = self.milestone;
        let style = Style::stroked(theme.saturated_color(Hue::Red, Variant::Line), 2.0);
        self.view.draw_lines("milestone", style, move |window| {
            if !window.x.contains(&milestone) {
                return Vec::new();
            }
            vec![DomainLine {
                x0: milestone,
                y0: window.y.start,
                x1: milestone,
                y1: window.y.end,
            }]
        });

        let load = Rc::clone(&self.load);
        let origin = self.origin;
        let style = Style::stroked(theme.saturated_color(Hue::Teal, Variant::Line), 1.5);
        self.load_view.draw_lines("load", style, move |window| {
            load_steps(&load.borrow(), origin, window.x.start, window.x.end)
        });
    }
}

/// Interactive bars for `tasks`, snapping to whole hours and rows.
fn task_items(
    timeline: &TimelineRuler,
    resources: &ItemRuler,
    tasks: &[Task],
    rows: usize,
) -> InteractionHandler<usize> {
    let mut handler = InteractionHandler::new();
    handler.set_size_limits(SizeLimits {
        min_width: Some(HOUR),
        ..SizeLimits::default()
    });
    handler.set_snap_x(|x, _| (x / HOUR).round() * HOUR);
    handler.set_snap_y(move |y, _| {
        let row = (y - BAR_INSET).round().clamp(0.0, rows.saturating_sub(1) as f64);
        row + BAR_INSET
    });

    let decoder = timeline.clone();
    handler.set_item_tooltip(move |item| {
        let (start, stop) = item.x_range(&decoder);
        let name = item.visuals.label.as_deref().unwrap_or_default();
        Some(format!(
            "{name}\n{} .. {}",
            start.format("%Y-%m-%d %H:%M"),
            stop.format("%Y-%m-%d %H:%M")
        ))
    });

    handler.add_items(tasks.iter().enumerate().map(|(i, task)| {
        let top = task.row as f64 + BAR_INSET;
        InteractiveItem::spanning(
            i,
            timeline,
            resources,
            (&task.start, &task.stop),
            (&top, &(top + 1.0 - 2.0 * BAR_INSET)),
        )
        .with_visuals(ItemVisuals {
            stroke_width: 1.0,
            label: Some(task.name.clone()),
            ..ItemVisuals::default()
        })
        .with_capabilities(ItemCapabilities::default())
    }));
    handler
}

/// Saturdays and Sundays starting within `[start, stop)`, plus the one
/// `start` falls in.
fn weekend_days(start: NaiveDateTime, stop: NaiveDateTime) -> impl Iterator<Item = NaiveDateTime> {
    let first = start.date().and_time(chrono::NaiveTime::MIN);
    let count = (stop - first).num_days().max(0) + 1;
    (0..count)
        .map(move |i| first + TimeDelta::days(i))
        .filter(|day| matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
}

/// Step outline of the daily load over the visible days.
fn load_steps(
    load: &[u32],
    origin: NaiveDateTime,
    start: NaiveDateTime,
    stop: NaiveDateTime,
) -> Vec<DomainLine<NaiveDateTime, f64>> {
    let first = (start - origin).num_days().max(0) as usize;
    let last = ((stop - origin).num_days().max(0) as usize + 1).min(load.len());
    let day = |i: usize| origin + TimeDelta::days(i as i64);

    let mut lines = Vec::new();
    for i in first..last {
        let value = load[i] as f64;
        lines.push(DomainLine {
            x0: day(i),
            y0: value,
            x1: day(i + 1),
            y1: value,
        });
        if let Some(next) = load.get(i + 1).filter(|_| i + 1 < last) {
            lines.push(DomainLine {
                x0: day(i + 1),
                y0: value,
                x1: day(i + 1),
                y1: *next as f64,
            });
        }
    }
    lines
}

impl ScheduleDemo {
    /// Task list as last written back by a drop.
    pub fn task_list(&self) -> Vec<Task> {
        self.data.borrow().clone()
    }

    pub fn theme(&self) -> &ColorMap {
        self.view.theme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Modifiers, PointerButton};
    use rnav::{AxisModel, PointerInput};

    fn origin() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_generated_tasks_stay_in_range() {
        let tasks = generate_tasks(10, origin(), 60, 1);
        assert!(!tasks.is_empty());
        let end = origin() + TimeDelta::days(60);
        for task in &tasks {
            assert!(task.row < 10);
            assert!(task.start < task.stop);
            assert!(task.stop < end);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate_tasks(3, origin(), 30, 42), generate_tasks(3, origin(), 30, 42));
    }

    #[test]
    fn test_daily_load_counts_overlaps() {
        let task = |start: i64, stop: i64| Task {
            row: 0,
            name: "t".to_string(),
            start: origin() + TimeDelta::hours(start),
            stop: origin() + TimeDelta::hours(stop),
        };
        let load = daily_load(&[task(2, 30), task(20, 22), task(50, 60)], origin(), 4);
        assert_eq!(load, vec![2, 1, 1, 0]);
    }

    #[test]
    fn test_weekend_days() {
        // 2024-01-01 is a Monday
        let days: Vec<u32> = weekend_days(origin(), origin() + TimeDelta::days(14))
            .map(|d| d.day())
            .collect();
        assert_eq!(days, vec![6, 7, 13, 14]);
    }

    #[test]
    fn test_build_registers_layers_and_items() {
        let demo = ScheduleDemo::build(&NavigationConfig::default(), 20).unwrap();
        let names: Vec<&str> = demo.view.layers().names().collect();
        assert_eq!(names, vec!["weekends", "milestone"]);
        assert_eq!(demo.load_view.layers().names().collect::<Vec<_>>(), vec!["load"]);
        assert_eq!(demo.tasks.len(), demo.task_list().len());
    }

    #[test]
    fn test_theme_switch_keeps_layer_order() {
        let mut demo = ScheduleDemo::build(&NavigationConfig::default(), 5).unwrap();
        let before: Vec<String> = demo.view.layers().names().map(str::to_string).collect();
        demo.set_dark_mode(false);
        assert!(!demo.theme().is_dark());
        let after: Vec<String> = demo.view.layers().names().map(str::to_string).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_drop_writes_back_task() {
        let mut demo = ScheduleDemo::build(&NavigationConfig::default(), 5).unwrap();
        demo.view.resize(720.0, 150.0);
        demo.load_view.resize(720.0, 100.0);
        let ten_days = origin() + TimeDelta::days(10);
        let (id, item) = demo
            .tasks
            .items()
            .find(|(_, item)| {
                let (start, _) = item.x_range(demo.view.h_axis());
                item.rect.width >= 24.0 * HOUR && start < ten_days
            })
            .map(|(id, item)| (id, item.clone()))
            .unwrap();
        let task_before = demo.task_list()[item.data].clone();
        let pixel = item.rect.to_pixels(demo.view.h_axis(), demo.view.v_axis()).center();
        let h = demo.view.h_axis();
        let day = (h.to_pixel(&(ten_days + TimeDelta::days(1))) - h.to_pixel(&ten_days)) as f32;

        for input in [
            PointerInput::Pressed {
                pos: pixel,
                button: PointerButton::Primary,
                modifiers: Modifiers::NONE,
            },
            PointerInput::Moved {
                pos: pixel + egui::vec2(day, 0.0),
            },
            PointerInput::Released {
                pos: pixel + egui::vec2(day, 0.0),
                button: PointerButton::Primary,
            },
        ] {
            demo.view.handle_pointer_with(&mut demo.tasks, &input);
        }

        let task_after = &demo.task_list()[item.data];
        assert_eq!(task_after.row, task_before.row);
        assert_eq!(task_after.start, task_before.start + TimeDelta::hours(24));
        assert_eq!(task_after.stop, task_before.stop + TimeDelta::hours(24));
        assert_eq!(demo.tasks.item(id).map(|i| i.rect.width), Some(item.rect.width));
    }

    #[test]
    fn test_views_share_timeline() {
        let mut demo = ScheduleDemo::build(&NavigationConfig::default(), 5).unwrap();
        demo.view.resize(720.0, 150.0);
        demo.load_view.resize(720.0, 100.0);
        demo.sync_views();

        demo.view.h_axis_mut().pan(200.0);
        assert!(demo.sync_views());
        assert_eq!(demo.load_view.h_axis().visible_start(), demo.view.h_axis().visible_start());
    }
}
