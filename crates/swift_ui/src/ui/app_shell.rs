use std::time::{Duration, Instant};

use eframe::egui;

use crate::app::{Mode, SwiftRideApp};
use crate::ui::booking_panel::render_booking_panel;
use crate::ui::constants::FRAME_INTERVAL_MS;
use crate::ui::driver_panel::render_driver_panel;
use crate::ui::notices::render_notices;
use crate::ui::rendering::render_map;
use crate::ui::topbar::render_top_bar;

pub fn run() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "SwiftRide",
        options,
        Box::new(|_cc| Ok(Box::new(SwiftRideApp::new()))),
    )
}

impl eframe::App for SwiftRideApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.frame(now);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            render_top_bar(ui, self, now);
        });

        if !self.notices.is_empty() {
            egui::TopBottomPanel::bottom("notices").show(ctx, |ui| {
                render_notices(ui, self);
            });
        }

        egui::SidePanel::left("flow_panel")
            .resizable(false)
            .default_width(360.0)
            .show(ctx, |ui| match self.mode {
                Mode::Rider => render_booking_panel(ui, self, now),
                Mode::Driver => render_driver_panel(ui, self, now),
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            render_map(ui, self, now);
        });

        if self.camera.is_animating(now) {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(FRAME_INTERVAL_MS));
        }
    }
}
