use crate::error::Result;
use crate::normalizer::DateOrder;
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path};

#[derive(Default)]
pub struct ConfigUpdate {
    pub output_dir: Option<String>,
    pub threshold: Option<f64>,
    pub substring_match: Option<bool>,
    pub scan_rows: Option<usize>,
    pub date_order: Option<DateOrder>,
    pub reconciled: Option<String>,
}

impl ConfigUpdate {
    fn is_empty(&self) -> bool {
        self.output_dir.is_none()
            && self.threshold.is_none()
            && self.substring_match.is_none()
            && self.scan_rows.is_none()
            && self.date_order.is_none()
            && self.reconciled.is_none()
    }
}

pub fn run(update: ConfigUpdate) -> Result<()> {
    let mut settings = load_settings();

    if !update.is_empty() {
        if let Some(dir) = update.output_dir {
            settings.output_dir = shellexpand_path(&dir);
        }
        if let Some(t) = update.threshold {
            settings.match_threshold = t;
        }
        if let Some(s) = update.substring_match {
            settings.substring_match = s;
        }
        if let Some(n) = update.scan_rows {
            settings.header_scan_rows = n;
        }
        if let Some(order) = update.date_order {
            settings.date_order = order;
        }
        if let Some(flag) = update.reconciled {
            settings.reconciled = flag;
        }
        save_settings(&settings)?;
        println!("Saved {}", settings_path().display());
    }

    let date_order = match settings.date_order {
        DateOrder::DayFirst => "day_first",
        DateOrder::MonthFirst => "month_first",
    };
    println!("Output dir:       {}", settings.output_dir);
    println!("Header scan rows: {}", settings.header_scan_rows);
    println!("Match threshold:  {}", settings.match_threshold);
    println!("Substring match:  {}", settings.substring_match);
    println!("Date order:       {date_order}");
    println!("Reconciled:       {}", settings.reconciled);
    Ok(())
}
