// Shared HTML fixtures shaped like the climate site's Daily Data Report page
#![allow(dead_code)]

/// A day row with all 12 cells filled.
pub fn day_row(day: usize) -> String {
    format!(
        "<tr><td><abbr title=\"day {day}\">{day:02}</abbr></td>\
         <td>{max}</td><td>{min}</td><td>{mean}</td>\
         <td>12.4</td><td>0.0</td><td>0.0</td><td>2.0</td><td>1.8</td>\
         <td>3</td><td>25</td><td>48</td></tr>",
        max = format!("{}.5", day % 7),
        min = format!("-{}.0", day % 5),
        mean = format!("{}.2", day % 3),
    )
}

/// A full report page with the usual 2 header rows and 4 summary rows.
pub fn report_page(heading: &str, rows: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><title>Daily Data Report</title></head>
<body>
  <main>
    <h1 id="wb-cont">{heading}</h1>
    <div id="dynamicDataTable">
      <table class="table">
        <caption>Daily Data Report</caption>
        <thead>
          <tr><th>DAY</th><th>Max Temp</th><th>Min Temp</th><th>Mean Temp</th><th>Heat Deg Days</th><th>Cool Deg Days</th><th>Total Rain</th><th>Total Snow</th><th>Total Precip</th><th>Snow on Grnd</th><th>Dir of Max Gust</th><th>Spd of Max Gust</th></tr>
          <tr><th></th><th>°C</th><th>°C</th><th>°C</th><th></th><th></th><th>mm</th><th>cm</th><th>mm</th><th>cm</th><th>10's deg</th><th>km/h</th></tr>
        </thead>
        <tbody>
          {rows}
          <tr><td>Sum</td><td></td><td></td><td></td><td>400.2</td><td>0.0</td><td>10.0</td><td>20.0</td><td>30.0</td><td></td><td></td><td></td></tr>
          <tr><td>Avg</td><td>1.0</td><td>-3.0</td><td>-1.0</td><td></td><td></td><td></td><td></td><td></td><td></td><td></td><td></td></tr>
          <tr><td>Xtrm</td><td>9.5</td><td>-14.0</td><td></td><td></td><td></td><td></td><td></td><td></td><td></td><td></td><td></td></tr>
          <tr><td colspan="12">Summary, average and extreme values are based on the data above.</td></tr>
        </tbody>
      </table>
    </div>
  </main>
</body>
</html>"#,
        rows = rows.join("\n          ")
    )
}

/// A report page declaring `month_name year` with `days` complete day rows.
pub fn monthly_report(month_name: &str, year: i32, days: usize) -> String {
    let rows: Vec<String> = (1..=days).map(day_row).collect();
    report_page(
        &format!("Daily Data Report for {month_name} {year}"),
        &rows,
    )
}
