mod readings;
mod setpoints;
