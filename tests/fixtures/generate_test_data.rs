// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成 5 个测试工作簿，供命令行手工验证
// 输出: tests/fixtures/datasets/*.xlsx
// ==========================================

use rust_xlsxwriter::Workbook;
use std::error::Error;

const SITES_SHEET: &str = "Liste des sites avec adresses";
const USERS_SHEET: &str = "Liste des utilisateurs clients";

// 工地表表头
const SITE_HEADER: &[&str] = &[
    "Zip/Postal code",
    "Ville",
    "Adresse",
    "Nom du site (CHANTIER)",
    "CGR Chantier",
    "N° Mag. (facultatif)",
    "LOT / REGIONS",
    "Nom du compte (sur Salesforce)",
];

// 用户表表头
const USER_HEADER: &[&str] = &[
    "Mail",
    "Type (Donneurs d'ordre ou Site)",
    "Nom",
    "Prénom",
    "Périmètre des sites",
];

const CITIES: &[(&str, &str)] = &[
    ("75001", "Paris"),
    ("69001", "Lyon"),
    ("13001", "Marseille"),
    ("59000", "Lille"),
    ("33000", "Bordeaux"),
];

// 工地记录结构
#[derive(Clone)]
struct SiteRow {
    postal_code: String,
    city: String,
    address: String,
    site_name: String,
    site_key: String,
    store_number: String,
    region: String,
    account_name: String,
}

impl SiteRow {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.postal_code.clone(),
            self.city.clone(),
            self.address.clone(),
            self.site_name.clone(),
            self.site_key.clone(),
            self.store_number.clone(),
            self.region.clone(),
            self.account_name.clone(),
        ]
    }
}

// 用户记录结构
#[derive(Clone)]
struct UserRow {
    email: String,
    user_type: String,
    last_name: String,
    first_name: String,
    site_scope: String,
}

impl UserRow {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.email.clone(),
            self.user_type.clone(),
            self.last_name.clone(),
            self.first_name.clone(),
            self.site_scope.clone(),
        ]
    }
}

fn generate_normal_site(seq: usize) -> SiteRow {
    let (postal_code, city) = CITIES[seq % CITIES.len()];
    SiteRow {
        postal_code: postal_code.to_string(),
        city: city.to_string(),
        address: format!("{} rue de la République", seq + 1),
        site_name: format!("Chantier {}", city),
        site_key: format!("CH-{:05}", seq),
        store_number: format!("M-{:03}", seq % 1000),
        region: format!("LOT {}", seq % 4 + 1),
        account_name: "ACME Construction".to_string(),
    }
}

fn generate_normal_user(seq: usize) -> UserRow {
    UserRow {
        email: format!("contact{:04}@exemple.fr", seq),
        user_type: if seq % 3 == 0 {
            "Donneur d'ordre".to_string()
        } else {
            "Site".to_string()
        },
        last_name: format!("Nom{}", seq),
        first_name: format!("Prénom{}", seq),
        site_scope: format!("LOT {}", seq % 4 + 1),
    }
}

fn write_sheet(
    workbook: &mut Workbook,
    name: &str,
    header: &[&str],
    rows: &[Vec<String>],
) -> Result<(), Box<dyn Error>> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name)?;
    for (col, h) in header.iter().enumerate() {
        worksheet.write_string(0, col as u16, *h)?;
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(r as u32 + 1, c as u16, value.as_str())?;
            }
        }
    }
    Ok(())
}

fn save(path: &str, sites: &[SiteRow], users: &[UserRow]) -> Result<(), Box<dyn Error>> {
    let mut workbook = Workbook::new();
    let site_rows: Vec<_> = sites.iter().map(SiteRow::to_row).collect();
    let user_rows: Vec<_> = users.iter().map(UserRow::to_row).collect();
    write_sheet(&mut workbook, SITES_SHEET, SITE_HEADER, &site_rows)?;
    write_sheet(&mut workbook, USERS_SHEET, USER_HEADER, &user_rows)?;
    workbook.save(path)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all("tests/fixtures/datasets")?;

    generate_clean_data()?;
    generate_resolvable_duplicates()?;
    generate_site_conflict()?;
    generate_email_conflict()?;
    generate_missing_info()?;

    println!("\n所有测试数据已生成到 tests/fixtures/datasets/");
    Ok(())
}

fn generate_clean_data() -> Result<(), Box<dyn Error>> {
    let sites: Vec<_> = (0..20).map(generate_normal_site).collect();
    let users: Vec<_> = (0..10).map(generate_normal_user).collect();
    save("tests/fixtures/datasets/01_clean.xlsx", &sites, &users)?;
    println!("✓ 生成 01_clean.xlsx (20 工地 / 10 用户)");
    Ok(())
}

fn generate_resolvable_duplicates() -> Result<(), Box<dyn Error>> {
    let mut sites: Vec<_> = (0..10).map(generate_normal_site).collect();
    // 完全相同的重复行
    for i in [0, 3, 6] {
        sites.push(generate_normal_site(i));
    }
    let mut users: Vec<_> = (0..5).map(generate_normal_user).collect();
    users.push(generate_normal_user(2));

    save("tests/fixtures/datasets/02_resolvable_duplicates.xlsx", &sites, &users)?;
    println!("✓ 生成 02_resolvable_duplicates.xlsx (13 工地含 3 条重复 / 6 用户含 1 条重复)");
    Ok(())
}

fn generate_site_conflict() -> Result<(), Box<dyn Error>> {
    let mut sites: Vec<_> = (0..10).map(generate_normal_site).collect();
    // 同 CGR Chantier，城市不同
    let mut conflict = generate_normal_site(4);
    conflict.city = "Toulouse".to_string();
    sites.push(conflict);
    let users: Vec<_> = (0..5).map(generate_normal_user).collect();

    save("tests/fixtures/datasets/03_site_conflict.xlsx", &sites, &users)?;
    println!("✓ 生成 03_site_conflict.xlsx (CH-00004 冲突)");
    Ok(())
}

fn generate_email_conflict() -> Result<(), Box<dyn Error>> {
    let sites: Vec<_> = (0..5).map(generate_normal_site).collect();
    let mut users: Vec<_> = (0..5).map(generate_normal_user).collect();
    // 同邮箱，类型不同
    let mut conflict = generate_normal_user(1);
    conflict.user_type = "Donneur d'ordre".to_string();
    users.push(conflict);

    save("tests/fixtures/datasets/04_email_conflict.xlsx", &sites, &users)?;
    println!("✓ 生成 04_email_conflict.xlsx (contact0001 冲突)");
    Ok(())
}

fn generate_missing_info() -> Result<(), Box<dyn Error>> {
    let mut sites: Vec<_> = (0..10).map(generate_normal_site).collect();
    sites[1].store_number.clear();
    sites[3].city.clear();
    sites[3].region.clear();
    sites[5].account_name.clear(); // 不计入缺失，ID Contact 为空

    let mut users: Vec<_> = (0..6).map(generate_normal_user).collect();
    users[2].first_name.clear();
    users[4].site_scope.clear();

    save("tests/fixtures/datasets/05_missing_info.xlsx", &sites, &users)?;
    println!("✓ 生成 05_missing_info.xlsx (2 工地 / 2 用户缺失信息)");
    Ok(())
}
