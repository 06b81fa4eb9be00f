//! Listing pages, archives and CSV bodies served by the mock server

use std::io::Write;

/// Station CSV whose `HourlyDryBulbTemperature` column peaks at 25
pub const STATION_CSV: &str = "STATION,DATE,HourlyDryBulbTemperature\n\
01001099999,2021-01-01T00:20:00,10\n\
01001099999,2021-01-01T00:50:00,\n\
01001099999,2021-01-01T01:20:00,25s\n\
01001099999,2021-01-01T01:50:00,25\n\
01001099999,2021-01-01T02:20:00,7\n";

/// Apache autoindex page; the date is glued to the file name once the
/// cell text is concatenated
pub fn autoindex_page(rows: &[(&str, &str)]) -> String {
    let mut html = String::from(
        "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 3.2 Final//EN\">\n<html><head><title>Index of /access/2021</title></head><body>\n<table>\n\
<tr><th><a href=\"?C=N;O=D\">Name</a></th><th><a href=\"?C=M;O=A\">Last modified</a></th><th><a href=\"?C=S;O=A\">Size</a></th></tr>\n\
<tr><th colspan=\"3\"><hr></th></tr>\n",
    );
    for (name, modified) in rows {
        html.push_str(&format!(
            "<tr><td><a href=\"{name}\">{name}</a></td><td align=\"right\">{modified}  </td><td align=\"right\">4.1M</td></tr>\n"
        ));
    }
    html.push_str("<tr><th colspan=\"3\"><hr></th></tr>\n</table>\n</body></html>\n");
    html
}

/// ZIP archive holding the given members
pub fn zip_archive(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
