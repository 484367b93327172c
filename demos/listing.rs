extern crate env_logger;
extern crate ftp_listing;

use ftp_listing::{ListRequest, Result, Session};

// Stands in for a real FTP connection.
fn canned_list(req: &ListRequest) -> Result<String> {
    let body = match req.path.as_str() {
        "/" => "drwxr-xr-x   2 ftp      ftp          4096 Jan 12  2021 pub\n",
        "/pub" => {
            "drwxr-xr-x   2 ftp      ftp          4096 Jan 12  2021 .\n\
             drwxr-xr-x   3 ftp      ftp          4096 Jan 12  2021 ..\n\
             -rw-r--r--   1 ftp      ftp        216132 Nov 25  2011 ftpext-charter.txt\n\
             -rw-r--r--   1 ftp      ftp          1024 Mar  2 09:30 release notes.txt\n"
        }
        _ => "",
    };
    Ok(body.to_owned())
}

fn browse(session: &mut Session) -> Result<()> {
    for target in &["pub", "..", "/pub", "missing"] {
        session.change_dir(target);
        println!("{}", session.url(None));

        let mut transport = canned_list;
        for entry in session.list_directory(&mut transport)? {
            println!(
                "  {} {:<8} {:<8} {:>8} {} {}",
                entry.flags,
                entry.owner,
                entry.group,
                entry.size,
                entry.create_time.format("%Y-%m-%d %H:%M"),
                entry.name
            );
        }
        session.change_dir("..");
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let mut session = Session::new("127.0.0.1");
    session.set_credentials("anonymous", "guest");
    browse(&mut session).unwrap_or_else(|err| panic!("{}", err));
    println!("done")
}
