//! Industry and template commands — `pms catalog`.

use anyhow::Result;

use pms::errors::MessageOverrides;
use pms::models::NewTemplate;

use super::{Context, print_problems};
use crate::CatalogCommands;

pub async fn cmd_catalog(ctx: &mut Context, command: CatalogCommands) -> Result<()> {
    ctx.require_login()?;

    match command {
        CatalogCommands::Industries => {
            let result = ctx.api.industries(&mut ctx.session).await;
            let industries = ctx.settle(result, &MessageOverrides::new())?;
            for industry in &industries {
                println!("  {:<8} {}", industry.industry_id, industry.industry_name);
            }
        }
        CatalogCommands::Templates { name } => {
            let result = ctx.api.search_templates(&mut ctx.session, name.trim()).await;
            let templates = ctx.settle(result, &MessageOverrides::new())?;
            if templates.is_empty() {
                println!("{}", console::style("No templates found.").dim());
            }
            for template in &templates {
                let industry = template
                    .industry
                    .as_ref()
                    .map(|i| i.industry_name.as_str())
                    .unwrap_or("");
                println!(
                    "  {:<8} {:<50} {}",
                    template.template_id,
                    template.template_name,
                    console::style(industry).dim()
                );
            }
        }
        CatalogCommands::CreateTemplate {
            industry,
            name,
            phases,
        } => {
            let template = NewTemplate::new(industry, name, &phases);
            print_problems(&template.validate())?;

            let result = ctx.api.create_template(&mut ctx.session, &template).await;
            ctx.settle(result, &MessageOverrides::new())?;
            println!(
                "{} Created template {} with {} phase(s)",
                console::style("✓").green(),
                console::style(&template.template_name).bold(),
                template.template_phases.len()
            );
        }
    }

    Ok(())
}
