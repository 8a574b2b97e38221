//! Renders the spending by category as a bar chart.
//!
//! The chart is an ECharts configuration built with charming, embedded in a
//! standalone HTML page that loads ECharts from a CDN. The page is written to
//! disk and can then be opened in the browser.

use std::{fs, path::Path};

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::Bar,
};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{Error, report::CategoryTotal};

/// The title shown above the chart and in the browser tab.
pub const CHART_TITLE: &str = "Spending by Category";

const CHART_ELEMENT_ID: &str = "spending-chart";
const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// Create a bar chart with one bar per category.
pub fn spending_chart(totals: &[CategoryTotal]) -> Chart {
    let labels: Vec<String> = totals
        .iter()
        .map(|total| total.category.to_string())
        .collect();
    let values: Vec<f64> = totals.iter().map(|total| total.total as f64).collect();

    Chart::new()
        .title(Title::new().text(CHART_TITLE).left("center"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name("Category")
                .data(labels),
        )
        .y_axis(Axis::new().type_(AxisType::Value).name("Rs.Amount"))
        .series(Bar::new().name("Spent").data(values))
}

/// Render `chart` as a full HTML page.
pub fn chart_page(chart: &Chart) -> Markup {
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chart = echarts.init(document.getElementById("{CHART_ELEMENT_ID}"));
            chart.setOption({});
            window.addEventListener('resize', chart.resize);
        }});"#,
        chart
    );

    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (CHART_TITLE) " - Spendwatch" }
                script src=(ECHARTS_SCRIPT_URL) {}
                script { (PreEscaped(script)) }
            }
            body style="margin: 0"
            {
                div id=(CHART_ELEMENT_ID) style="width: 100vw; height: 100vh" {}
            }
        }
    }
}

/// Write the chart of `totals` as an HTML page to `path`.
///
/// # Errors
/// Returns [Error::Chart] if the file cannot be written.
pub fn save_chart(totals: &[CategoryTotal], path: &Path) -> Result<(), Error> {
    let page = chart_page(&spending_chart(totals));

    fs::write(path, page.into_string())
        .map_err(|error| Error::Chart(format!("could not write {path:?}: {error}")))?;
    tracing::debug!("Saved chart to {path:?}");

    Ok(())
}
