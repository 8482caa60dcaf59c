pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_tenants.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_tenants.sql")),
				"tables/002_users.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_users.sql")),
				"tables/003_tenant_users.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_tenant_users.sql")),
				"tables/004_notifications.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_notifications.sql")),
				"tables/005_faqs.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_faqs.sql")),
				"tables/006_faq_elements.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_faq_elements.sql")),
				"tables/007_concept_emp_elements.sql" => out
					.push_str(include_str!("../../../sql/tables/007_concept_emp_elements.sql")),
				"tables/008_well_planners.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_well_planners.sql")),
				"tables/009_well_planner_planned_steps.sql" => out
					.push_str(include_str!("../../../sql/tables/009_well_planner_planned_steps.sql")),
				"tables/010_planned_vessel_uses.sql" =>
					out.push_str(include_str!("../../../sql/tables/010_planned_vessel_uses.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
